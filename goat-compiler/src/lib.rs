//! Top-level driver tying the goat compilation pipeline together: an AST
//! rooted in an [`Arena`], lowered to bytecode by `goat-ast`, linked into one
//! image by `goat-link`.
//!
//! Downstream users generally only need this crate: it re-exports the
//! pieces of `goat-ast`, `goat-codegen` and `goat-link` that make up the
//! public surface of a compilation (`Config`, `CompileError`, `Bytecode`,
//! …) rather than making callers depend on every sibling crate by hand.

#![warn(missing_docs)]

pub use goat_ast::{Arena, CompileError, NodeId, NodeKind};
pub use goat_codegen::Config;
pub use goat_link::Bytecode;

use goat_codegen::{CodeBuilder, DataBuilder};
use goat_link::Linker;

/// Compile the AST rooted at `root` (owned by `arena`) into a linked
/// bytecode image.
///
/// This is the single entry point the rest of the pipeline exists to
/// support: it allocates fresh code/data builders, emits the program
/// (draining any deferred function bodies along the way), and links the
/// result.
#[tracing::instrument(level = "debug", skip(arena, config))]
pub fn compile(arena: &Arena, root: NodeId, config: &Config) -> Result<Bytecode, CompileError> {
    let mut code = CodeBuilder::new(config);
    let mut data = DataBuilder::new(config);

    goat_ast::emit_program(arena, root, &mut code, &mut data)?;

    tracing::debug!(instructions = code.len(), "emission complete, linking");
    Ok(Linker::link(&code, &data))
}

#[cfg(test)]
mod tests {
    use goat_ast::NodeKind;
    use goat_asm::Opcode;

    use super::*;

    #[test]
    fn compiles_a_trivial_program_to_a_linked_image() {
        let config = Config::default();
        let mut arena = Arena::new(&config);
        let two = arena.alloc(NodeKind::Integer(2));
        let three = arena.alloc(NodeKind::Integer(3));
        let add = arena.alloc(NodeKind::Addition(two, three));
        let stmt = arena.alloc(NodeKind::StatementExpression(add));
        let root = arena.alloc(NodeKind::Root(vec![stmt]));

        let bytecode = compile(&arena, root, &config).unwrap();
        let ops: Vec<Opcode> = bytecode.instructions().map(|i| i.opcode()).collect();
        assert_eq!(
            ops,
            vec![Opcode::Iload32, Opcode::Iload32, Opcode::Add, Opcode::Pop, Opcode::End]
        );
        assert_eq!(bytecode.header().instructions_offset, 32);
    }

    #[test]
    fn propagates_too_many_arguments_as_an_error() {
        let config = Config::default();
        let mut arena = Arena::new(&config);
        let callee = arena.alloc(NodeKind::Variable("f".into()));
        let args: Vec<_> = (0..65536).map(|_| arena.alloc(NodeKind::Null)).collect();
        let call = arena.alloc(NodeKind::FunctionCall { callee, args });
        let stmt = arena.alloc(NodeKind::StatementExpression(call));
        let root = arena.alloc(NodeKind::Root(vec![stmt]));

        let result = compile(&arena, root, &config);
        assert_eq!(result, Err(CompileError::TooManyArguments { found: 65536 }));
    }

    #[test]
    fn compiling_twice_from_the_same_ast_is_deterministic() {
        let config = Config::default();
        let mut arena = Arena::new(&config);
        let x = arena.alloc(NodeKind::Variable("x".into()));
        let five = arena.alloc(NodeKind::Integer(5));
        let decl = arena.alloc(NodeKind::VariableDeclarator {
            name: "x".into(),
            initial: Some(five),
        });
        let decls = arena.alloc(NodeKind::VariableDeclaration(vec![decl]));
        let stmt = arena.alloc(NodeKind::StatementExpression(x));
        let root = arena.alloc(NodeKind::Root(vec![decls, stmt]));

        let first = compile(&arena, root, &config).unwrap();
        let second = compile(&arena, root, &config).unwrap();
        assert_eq!(first.buffer(), second.buffer());
    }
}
