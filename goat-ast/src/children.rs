use crate::arena::NodeId;
use crate::node::{Node, NodeKind};

/// Returns the node's children as `(tag, id)` pairs, in the order the
/// visitor contract enumerates them.
///
/// Tags are short, stable English labels (`"left"`, `"right"`, `"target"`,
/// …); they are part of the observable contract for visualization and
/// disassembly tooling, not an implementation detail, so renaming a tag here
/// is a breaking change just as renaming an opcode would be.
fn labeled_children(node: &Node) -> Vec<(&'static str, NodeId)> {
    match node.kind() {
        NodeKind::Root(statements) | NodeKind::StatementList(statements) => {
            statements.iter().map(|&id| ("statement", id)).collect()
        }
        NodeKind::Null | NodeKind::True | NodeKind::False => Vec::new(),
        NodeKind::StaticString(_) | NodeKind::Integer(_) | NodeKind::Real(_) | NodeKind::Variable(_) => {
            Vec::new()
        }
        NodeKind::ParenExpr(inner) => vec![("expression", *inner)],
        NodeKind::FunctionObject { body, .. } => vec![("object", *body)],
        NodeKind::FunctionCall { callee, args } => {
            let mut children = vec![("object", *callee)];
            children.extend(args.iter().map(|&id| ("argument", id)));
            children
        }
        NodeKind::SimpleAssignment { target, value } => {
            vec![("target", *target), ("value", *value)]
        }
        NodeKind::Addition(left, right)
        | NodeKind::Subtraction(left, right)
        | NodeKind::Multiplication(left, right)
        | NodeKind::Division(left, right)
        | NodeKind::Modulo(left, right)
        | NodeKind::Power(left, right)
        | NodeKind::Less(left, right)
        | NodeKind::LessEq(left, right)
        | NodeKind::Greater(left, right)
        | NodeKind::GreaterEq(left, right)
        | NodeKind::Equal(left, right)
        | NodeKind::NotEqual(left, right) => vec![("left", *left), ("right", *right)],
        NodeKind::StatementExpression(expr) => vec![("expression", *expr)],
        NodeKind::VariableDeclaration(declarators) | NodeKind::ConstantDeclaration(declarators) => {
            declarators.iter().map(|&id| ("declarator", id)).collect()
        }
        NodeKind::VariableDeclarator { initial, .. } => {
            initial.map(|id| vec![("initial", id)]).unwrap_or_default()
        }
        NodeKind::ConstantDeclarator { initial, .. } => vec![("initial", *initial)],
        NodeKind::Return(value) => value.map(|id| vec![("value", id)]).unwrap_or_default(),
    }
}

impl Node {
    /// Number of structurally meaningful children this node has.
    pub fn child_count(&self) -> usize {
        labeled_children(self).len()
    }

    /// The child at position `i`, if any.
    pub fn child(&self, i: usize) -> Option<NodeId> {
        labeled_children(self).get(i).map(|&(_, id)| id)
    }

    /// The short label for the child at position `i`, if any.
    ///
    /// Every child returned by [`Node::child`] currently has a label; this
    /// stays `Option` because unlabeled children are a possibility future
    /// node kinds may introduce.
    pub fn child_tag(&self, i: usize) -> Option<&'static str> {
        labeled_children(self).get(i).map(|&(tag, _)| tag)
    }
}
