use crate::arena::{Arena, NodeId};
use crate::node::NodeKind;

/// Width, in spaces, of one indentation level in generated source text.
const INDENT_UNIT: &str = "    ";

/// A line-oriented text accumulator used by [`generate_source_indented`].
///
/// Each entry is an `(indent, text)` pair; [`SourceBuilder::build`] joins
/// them with [`INDENT_UNIT`] repeated `indent` times, followed by a newline.
/// This is deliberately dumb — no line wrapping, no re-flowing — the only
/// requirement on generated source is that it is deterministic and
/// round-trips to an equivalent AST, not that it is pretty.
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    lines: Vec<(usize, String)>,
}

impl SourceBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new line at the given indent level, seeded with `text`.
    pub fn add_line(&mut self, indent: usize, text: impl Into<String>) {
        self.lines.push((indent, text.into()));
    }

    /// Append `text` to the most recently started line.
    ///
    /// Panics if no line has been started yet, which would be a bug in the
    /// caller (every AST behaviour that uses a `SourceBuilder` starts with
    /// `add_line`).
    pub fn append_to_last_line(&mut self, text: &str) {
        let (_, line) = self.lines.last_mut().expect("add_line must precede append_to_last_line");
        line.push_str(text);
    }

    /// Join every accumulated line into the final source text.
    pub fn build(&self) -> String {
        let mut out = String::new();
        for (indent, text) in &self.lines {
            out.push_str(&INDENT_UNIT.repeat(*indent));
            out.push_str(text);
            out.push('\n');
        }
        out
    }
}

fn binary_operator(kind: &NodeKind) -> Option<(&'static str, NodeId, NodeId)> {
    match *kind {
        NodeKind::Addition(l, r) => Some(("+", l, r)),
        NodeKind::Subtraction(l, r) => Some(("-", l, r)),
        NodeKind::Multiplication(l, r) => Some(("*", l, r)),
        NodeKind::Division(l, r) => Some(("/", l, r)),
        NodeKind::Modulo(l, r) => Some(("%", l, r)),
        NodeKind::Power(l, r) => Some(("**", l, r)),
        NodeKind::Less(l, r) => Some(("<", l, r)),
        NodeKind::LessEq(l, r) => Some(("<=", l, r)),
        NodeKind::Greater(l, r) => Some((">", l, r)),
        NodeKind::GreaterEq(l, r) => Some((">=", l, r)),
        NodeKind::Equal(l, r) => Some(("==", l, r)),
        NodeKind::NotEqual(l, r) => Some(("!=", l, r)),
        _ => None,
    }
}

fn declarator_text(arena: &Arena, id: NodeId) -> String {
    match arena.kind(id) {
        NodeKind::VariableDeclarator { name, initial } => match initial {
            Some(init) => format!("{} = {}", name, generate_source(arena, *init)),
            None => name.clone(),
        },
        NodeKind::ConstantDeclarator { name, initial } => {
            format!("{} = {}", name, generate_source(arena, *initial))
        }
        other => unreachable!("declarator_text called on non-declarator node {other:?}"),
    }
}

/// Render the sub-tree rooted at `id` as a single line of canonical source
/// text.
///
/// The result is not guaranteed byte-identical to whatever text originally
/// parsed into this tree (whitespace and optional parentheses may differ),
/// only semantically equivalent: re-parsing it must emit the same bytecode.
pub fn generate_source(arena: &Arena, id: NodeId) -> String {
    if let Some((op, left, right)) = binary_operator(arena.kind(id)) {
        return format!(
            "{} {} {}",
            generate_source(arena, left),
            op,
            generate_source(arena, right)
        );
    }

    match arena.kind(id) {
        NodeKind::Root(statements) => {
            let body: Vec<String> = statements.iter().map(|&s| generate_source(arena, s)).collect();
            body.join(" ")
        }
        NodeKind::StatementList(statements) => {
            let body: Vec<String> = statements.iter().map(|&s| generate_source(arena, s)).collect();
            format!("{{ {} }}", body.join(" "))
        }
        NodeKind::Null => "null".to_string(),
        NodeKind::True => "true".to_string(),
        NodeKind::False => "false".to_string(),
        NodeKind::StaticString(content) => format!("{:?}", content),
        NodeKind::Integer(value) => value.to_string(),
        NodeKind::Real(value) => format!("{:?}", value),
        NodeKind::Variable(name) => name.clone(),
        NodeKind::ParenExpr(inner) => format!("({})", generate_source(arena, *inner)),
        NodeKind::FunctionObject { params, body } => {
            format!("function({}) {}", params.join(", "), generate_source(arena, *body))
        }
        NodeKind::FunctionCall { callee, args } => {
            let args: Vec<String> = args.iter().map(|&a| generate_source(arena, a)).collect();
            format!("{}({})", generate_source(arena, *callee), args.join(", "))
        }
        NodeKind::SimpleAssignment { target, value } => {
            format!("{} = {}", generate_source(arena, *target), generate_source(arena, *value))
        }
        NodeKind::StatementExpression(expr) => format!("{};", generate_source(arena, *expr)),
        NodeKind::VariableDeclaration(declarators) => {
            let parts: Vec<String> = declarators.iter().map(|&d| declarator_text(arena, d)).collect();
            format!("var {};", parts.join(", "))
        }
        NodeKind::ConstantDeclaration(declarators) => {
            let parts: Vec<String> = declarators.iter().map(|&d| declarator_text(arena, d)).collect();
            format!("const {};", parts.join(", "))
        }
        NodeKind::VariableDeclarator { .. } | NodeKind::ConstantDeclarator { .. } => {
            declarator_text(arena, id)
        }
        NodeKind::Return(value) => match value {
            Some(v) => format!("return {};", generate_source(arena, *v)),
            None => "return;".to_string(),
        },
        NodeKind::Addition(..)
        | NodeKind::Subtraction(..)
        | NodeKind::Multiplication(..)
        | NodeKind::Division(..)
        | NodeKind::Modulo(..)
        | NodeKind::Power(..)
        | NodeKind::Less(..)
        | NodeKind::LessEq(..)
        | NodeKind::Greater(..)
        | NodeKind::GreaterEq(..)
        | NodeKind::Equal(..)
        | NodeKind::NotEqual(..) => unreachable!("handled by binary_operator above"),
    }
}

/// Render the sub-tree rooted at `id` as multi-line, indented source text
/// into `builder`.
///
/// Leaf and inline-expression nodes append to the current line; statement
/// lists and statements that contain one introduce new lines at `indent`.
pub fn generate_source_indented(arena: &Arena, id: NodeId, builder: &mut SourceBuilder, indent: usize) {
    match arena.kind(id) {
        NodeKind::Root(statements) => {
            for &statement in statements {
                generate_source_indented(arena, statement, builder, indent);
            }
        }
        NodeKind::StatementList(statements) => {
            builder.add_line(indent, "{");
            for &statement in statements {
                generate_source_indented(arena, statement, builder, indent + 1);
            }
            builder.add_line(indent, "}");
        }
        NodeKind::StatementExpression(_)
        | NodeKind::VariableDeclaration(_)
        | NodeKind::ConstantDeclaration(_)
        | NodeKind::Return(_) => {
            builder.add_line(indent, generate_source(arena, id));
        }
        _ => {
            // Inline expression reached directly (e.g. the root of a call to
            // generate_source_indented on a bare expression): render it on
            // one line at the current indent rather than recursing further.
            builder.add_line(indent, generate_source(arena, id));
        }
    }
}
