use crate::arena::NodeId;

/// The payload carried by one AST node.
///
/// This is the "node v-table" collapsed into a single tagged union: rather
/// than a per-node function-pointer table (as a dynamically-typed host
/// language would use), dispatch on node behaviour is a `match` over this
/// enum. The node set is closed and known at compile time, so this is both
/// simpler and avoids the heap indirection a trait-object tree would need.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The top-level program: an ordered list of statements.
    Root(Vec<NodeId>),
    /// A lexical block: an ordered list of statements, bracketed by
    /// `ENTER`/`LEAVE` at emission time.
    StatementList(Vec<NodeId>),
    /// The `null` literal.
    Null,
    /// The `true` literal.
    True,
    /// The `false` literal.
    False,
    /// A string literal.
    StaticString(String),
    /// A signed 64-bit integer literal.
    Integer(i64),
    /// A binary64 floating-point literal.
    Real(f64),
    /// A bare identifier reference, in rvalue or assignment-target position.
    Variable(String),
    /// A parenthesized sub-expression; transparent at emission time.
    ParenExpr(NodeId),
    /// A function literal: its formal parameter names and the `NodeId` of
    /// its body statement list.
    FunctionObject {
        /// Formal parameter names, in declaration order.
        params: Vec<String>,
        /// The function body.
        body: NodeId,
    },
    /// A call expression: the callee expression and its argument list.
    FunctionCall {
        /// The expression evaluating to the callable.
        callee: NodeId,
        /// Argument expressions, in source order.
        args: Vec<NodeId>,
    },
    /// `target = value`.
    SimpleAssignment {
        /// The assignment target; must be an assignable node.
        target: NodeId,
        /// The value expression.
        value: NodeId,
    },
    /// `left + right`.
    Addition(NodeId, NodeId),
    /// `left - right`.
    Subtraction(NodeId, NodeId),
    /// `left * right`.
    Multiplication(NodeId, NodeId),
    /// `left / right`.
    Division(NodeId, NodeId),
    /// `left % right`.
    Modulo(NodeId, NodeId),
    /// `left ** right`.
    Power(NodeId, NodeId),
    /// `left < right`.
    Less(NodeId, NodeId),
    /// `left <= right`.
    LessEq(NodeId, NodeId),
    /// `left > right`.
    Greater(NodeId, NodeId),
    /// `left >= right`.
    GreaterEq(NodeId, NodeId),
    /// `left == right`.
    Equal(NodeId, NodeId),
    /// `left != right`.
    NotEqual(NodeId, NodeId),
    /// An expression evaluated purely for its side effect; its result is
    /// discarded.
    StatementExpression(NodeId),
    /// One or more `var` declarators, declared in order.
    VariableDeclaration(Vec<NodeId>),
    /// A single `var name [= initial]` declarator.
    VariableDeclarator {
        /// The declared name.
        name: String,
        /// The optional initializer; absent means "initialize to `null`".
        initial: Option<NodeId>,
    },
    /// One or more `const` declarators, declared in order.
    ConstantDeclaration(Vec<NodeId>),
    /// A single `const name = initial` declarator. Unlike
    /// [`NodeKind::VariableDeclarator`], the initializer is mandatory.
    ConstantDeclarator {
        /// The declared name.
        name: String,
        /// The mandatory initializer.
        initial: NodeId,
    },
    /// `return [value];`.
    Return(Option<NodeId>),
}

/// One node in an [`crate::Arena`]-owned AST.
///
/// `Node` is a thin wrapper around [`NodeKind`]; the split exists so
/// identity behaviours (tag, name, assignability) live next to the payload
/// they describe without growing the enum's own `match` arms every time a
/// new cross-cutting concern is added.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
}

impl Node {
    /// Wrap a [`NodeKind`] payload.
    pub fn new(kind: NodeKind) -> Self {
        Self { kind }
    }

    /// The node's payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// A short, stable identifier for the node's variant, used by
    /// visualization and disassembly output.
    pub fn type_tag(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root(_) => "Root",
            NodeKind::StatementList(_) => "StatementList",
            NodeKind::Null => "Null",
            NodeKind::True => "True",
            NodeKind::False => "False",
            NodeKind::StaticString(_) => "StaticString",
            NodeKind::Integer(_) => "Integer",
            NodeKind::Real(_) => "Real",
            NodeKind::Variable(_) => "Variable",
            NodeKind::ParenExpr(_) => "ParenExpr",
            NodeKind::FunctionObject { .. } => "FunctionObject",
            NodeKind::FunctionCall { .. } => "FunctionCall",
            NodeKind::SimpleAssignment { .. } => "SimpleAssignment",
            NodeKind::Addition(..) => "Addition",
            NodeKind::Subtraction(..) => "Subtraction",
            NodeKind::Multiplication(..) => "Multiplication",
            NodeKind::Division(..) => "Division",
            NodeKind::Modulo(..) => "Modulo",
            NodeKind::Power(..) => "Power",
            NodeKind::Less(..) => "Less",
            NodeKind::LessEq(..) => "LessEq",
            NodeKind::Greater(..) => "Greater",
            NodeKind::GreaterEq(..) => "GreaterEq",
            NodeKind::Equal(..) => "Equal",
            NodeKind::NotEqual(..) => "NotEqual",
            NodeKind::StatementExpression(_) => "StatementExpression",
            NodeKind::VariableDeclaration(_) => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::ConstantDeclaration(_) => "ConstantDeclaration",
            NodeKind::ConstantDeclarator { .. } => "ConstantDeclarator",
            NodeKind::Return(_) => "Return",
        }
    }

    /// A human-readable description of the node's variant, for
    /// visualization output (GraphViz labels and the like).
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root(_) => "program root",
            NodeKind::StatementList(_) => "statement block",
            NodeKind::Null => "null literal",
            NodeKind::True => "true literal",
            NodeKind::False => "false literal",
            NodeKind::StaticString(_) => "string literal",
            NodeKind::Integer(_) => "integer literal",
            NodeKind::Real(_) => "real literal",
            NodeKind::Variable(_) => "variable reference",
            NodeKind::ParenExpr(_) => "parenthesized expression",
            NodeKind::FunctionObject { .. } => "function literal",
            NodeKind::FunctionCall { .. } => "function call",
            NodeKind::SimpleAssignment { .. } => "assignment",
            NodeKind::Addition(..) => "addition",
            NodeKind::Subtraction(..) => "subtraction",
            NodeKind::Multiplication(..) => "multiplication",
            NodeKind::Division(..) => "division",
            NodeKind::Modulo(..) => "modulo",
            NodeKind::Power(..) => "exponentiation",
            NodeKind::Less(..) => "less-than comparison",
            NodeKind::LessEq(..) => "less-or-equal comparison",
            NodeKind::Greater(..) => "greater-than comparison",
            NodeKind::GreaterEq(..) => "greater-or-equal comparison",
            NodeKind::Equal(..) => "equality comparison",
            NodeKind::NotEqual(..) => "inequality comparison",
            NodeKind::StatementExpression(_) => "expression statement",
            NodeKind::VariableDeclaration(_) => "variable declaration",
            NodeKind::VariableDeclarator { .. } => "variable declarator",
            NodeKind::ConstantDeclaration(_) => "constant declaration",
            NodeKind::ConstantDeclarator { .. } => "constant declarator",
            NodeKind::Return(_) => "return statement",
        }
    }

    /// Whether this node may appear as the target of a [`NodeKind::SimpleAssignment`].
    ///
    /// Only bare variable references are assignable today.
    pub fn is_assignable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable(_))
    }

    /// The node's primary textual datum: an identifier name, a literal value
    /// rendered as text, or an empty string for nodes with no single scalar
    /// datum of their own.
    pub fn get_data(&self) -> String {
        match &self.kind {
            NodeKind::Variable(name) => name.clone(),
            NodeKind::StaticString(content) => content.clone(),
            NodeKind::Integer(value) => value.to_string(),
            NodeKind::Real(value) => value.to_string(),
            NodeKind::Null => "null".to_string(),
            NodeKind::True => "true".to_string(),
            NodeKind::False => "false".to_string(),
            NodeKind::VariableDeclarator { name, .. } => name.clone(),
            NodeKind::ConstantDeclarator { name, .. } => name.clone(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_variables_are_assignable() {
        assert!(Node::new(NodeKind::Variable("x".into())).is_assignable());
        assert!(!Node::new(NodeKind::Integer(1)).is_assignable());
        assert!(!Node::new(NodeKind::Null).is_assignable());
    }

    #[test]
    fn get_data_reflects_the_primary_datum() {
        assert_eq!(Node::new(NodeKind::Integer(42)).get_data(), "42");
        assert_eq!(Node::new(NodeKind::Variable("y".into())).get_data(), "y");
        assert_eq!(Node::new(NodeKind::StaticString("hi".into())).get_data(), "hi");
        assert_eq!(Node::new(NodeKind::StatementList(vec![])).get_data(), "");
    }

    #[test]
    fn type_tag_and_name_are_stable_identity() {
        let node = Node::new(NodeKind::Addition(NodeId::default(), NodeId::default()));
        assert_eq!(node.type_tag(), "Addition");
        assert_eq!(node.type_name(), "addition");
    }
}
