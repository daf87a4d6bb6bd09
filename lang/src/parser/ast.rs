use std::fmt;

/// A node of the syntax tree.
///
/// Composite nodes own their children outright: dropping a node drops its
/// whole subtree, and no child is ever shared between parents. Nodes are
/// built bottom-up during parsing and never mutated afterwards; collapsing
/// an operator run replaces operands with freshly built parents instead of
/// rewriting them in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Placeholder for a statement whose result is discarded, such as a
    /// bare literal. Parsed, counted, and dropped by any later stage.
    Empty,
    Program {
        body: Box<Node>,
    },
    Sequence {
        nodes: Vec<Node>,
    },
    FunctionCall {
        name: String,
        args: Vec<Node>,
    },
    If {
        condition: Box<Node>,
        then_body: Box<Node>,
        else_body: Option<Box<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    For {
        init: Box<Node>,
        condition: Box<Node>,
        increment: Box<Node>,
        body: Box<Node>,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
    Add {
        left: Box<Node>,
        right: Box<Node>,
    },
    Subtract {
        left: Box<Node>,
        right: Box<Node>,
    },
    Multiply {
        left: Box<Node>,
        right: Box<Node>,
    },
    Divide {
        left: Box<Node>,
        right: Box<Node>,
    },
    Mod {
        left: Box<Node>,
        right: Box<Node>,
    },
    IntConstant(i64),
    FloatConstant(f64),
    StringConstant(String),
    ListDefinition {
        items: Vec<Node>,
    },
    ListSlice {
        collection: Box<Node>,
        index: Box<Node>,
    },
    VariableRef {
        name: String,
    },
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

/// Recursive debug rendering: bracketed, field-labeled, one line.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Empty => write!(f, "<Empty>"),
            Node::Program { body } => write!(f, "<Program: {body}>"),
            Node::Sequence { nodes } => {
                write!(f, "<Sequence: [")?;
                write_joined(f, nodes)?;
                write!(f, "]>")
            }
            Node::FunctionCall { name, args } => {
                write!(f, "<FunctionCall name={name}, args=(")?;
                write_joined(f, args)?;
                write!(f, ")>")
            }
            Node::If {
                condition,
                then_body,
                else_body,
            } => {
                write!(f, "<If condition={condition}, then={then_body}")?;
                if let Some(else_body) = else_body {
                    write!(f, ", else={else_body}")?;
                }
                write!(f, ">")
            }
            Node::While { condition, body } => {
                write!(f, "<While condition={condition}, body={body}>")
            }
            Node::For {
                init,
                condition,
                increment,
                body,
            } => write!(
                f,
                "<For init={init}, condition={condition}, increment={increment}, body={body}>"
            ),
            Node::Assignment { name, value } => {
                write!(f, "<Assignment name={name}, value={value}>")
            }
            Node::Add { left, right } => write!(f, "<Add left={left}, right={right}>"),
            Node::Subtract { left, right } => {
                write!(f, "<Subtract left={left}, right={right}>")
            }
            Node::Multiply { left, right } => {
                write!(f, "<Multiply left={left}, right={right}>")
            }
            Node::Divide { left, right } => write!(f, "<Divide left={left}, right={right}>"),
            Node::Mod { left, right } => write!(f, "<Mod left={left}, right={right}>"),
            Node::IntConstant(value) => write!(f, "<IntConstant value={value}>"),
            Node::FloatConstant(value) => write!(f, "<FloatConstant value={value}>"),
            Node::StringConstant(value) => write!(f, "<StringConstant value=\"{value}\">"),
            Node::ListDefinition { items } => {
                write!(f, "<ListDefinition: [")?;
                write_joined(f, items)?;
                write!(f, "]>")
            }
            Node::ListSlice { collection, index } => {
                write!(f, "<ListSlice collection={collection}, index={index}>")
            }
            Node::VariableRef { name } => write!(f, "<VariableRef name=\"{name}\">"),
        }
    }
}
