use std::collections::VecDeque;

use goat_asm::{index_to_arg1, Instruction, Opcode};
use goat_codegen::{CodeBuilder, DataBuilder};
use goat_types::InstrIndex;

use crate::arena::{Arena, NodeId};
use crate::error::CompileError;
use crate::node::NodeKind;

/// The limit `CALL`'s `arg0` and `FUNC`'s `arg0` fields (both 16-bit) can
/// represent.
const MAX_ARGUMENT_COUNT: usize = 1 << 16;

/// Tracks function bodies whose bytecode has not been emitted yet.
///
/// [`NodeKind::FunctionObject`] emits its `ARG`/`FUNC` pair immediately but
/// defers compiling the body itself: the body's first instruction index
/// isn't known until the body has actually been emitted, and ordinary
/// control flow must never fall into a function body. This
/// context records, for each deferred body, the index of the placeholder
/// `ARG` instruction that must be patched with the body's real entry index
/// once [`emit_deferred_bodies`] gets around to compiling it.
#[derive(Debug, Default)]
pub struct EmitContext {
    pending: VecDeque<(InstrIndex, NodeId)>,
}

impl EmitContext {
    /// An empty context, with no deferred bodies queued.
    pub fn new() -> Self {
        Self::default()
    }

    fn defer_body(&mut self, entry_patch_target: InstrIndex, body: NodeId) {
        self.pending.push_back((entry_patch_target, body));
    }
}

fn binary_opcode(kind: &NodeKind) -> Option<(Opcode, NodeId, NodeId)> {
    match *kind {
        NodeKind::Addition(l, r) => Some((Opcode::Add, l, r)),
        NodeKind::Subtraction(l, r) => Some((Opcode::Sub, l, r)),
        NodeKind::Multiplication(l, r) => Some((Opcode::Mul, l, r)),
        NodeKind::Division(l, r) => Some((Opcode::Div, l, r)),
        NodeKind::Modulo(l, r) => Some((Opcode::Mod, l, r)),
        NodeKind::Power(l, r) => Some((Opcode::Power, l, r)),
        NodeKind::Less(l, r) => Some((Opcode::Lt, l, r)),
        NodeKind::LessEq(l, r) => Some((Opcode::Le, l, r)),
        NodeKind::Greater(l, r) => Some((Opcode::Gt, l, r)),
        NodeKind::GreaterEq(l, r) => Some((Opcode::Ge, l, r)),
        NodeKind::Equal(l, r) => Some((Opcode::Eq, l, r)),
        NodeKind::NotEqual(l, r) => Some((Opcode::Ne, l, r)),
        _ => None,
    }
}

/// Emit the rvalue lowering for the sub-tree rooted at `id`, returning the
/// index of the first instruction this call appended.
///
/// `ctx` accumulates function bodies encountered along the way; the caller
/// is responsible for draining it with [`emit_deferred_bodies`] once the
/// top-level emission (and everything it transitively triggers) completes.
#[tracing::instrument(level = "trace", skip(arena, code, data, ctx))]
pub fn emit_bytecode(
    arena: &Arena,
    id: NodeId,
    code: &mut CodeBuilder,
    data: &mut DataBuilder,
    ctx: &mut EmitContext,
) -> Result<InstrIndex, CompileError> {
    let kind = arena.kind(id);

    if let Some((opcode, left, right)) = binary_opcode(kind) {
        let first = emit_bytecode(arena, left, code, data, ctx)?;
        emit_bytecode(arena, right, code, data, ctx)?;
        code.append(Instruction::binary_op(opcode));
        return Ok(first);
    }

    match kind {
        NodeKind::Root(statements) => {
            let mut first = None;
            for &statement in statements {
                let idx = emit_bytecode(arena, statement, code, data, ctx)?;
                first.get_or_insert(idx);
            }
            let end = code.append(Instruction::end());
            Ok(first.unwrap_or(end))
        }
        NodeKind::StatementList(statements) => {
            let enter = code.append(Instruction::enter());
            for &statement in statements {
                emit_bytecode(arena, statement, code, data, ctx)?;
            }
            code.append(Instruction::leave());
            Ok(enter)
        }
        NodeKind::Null => Ok(code.append(Instruction::nil())),
        NodeKind::True => Ok(code.append(Instruction::tru())),
        NodeKind::False => Ok(code.append(Instruction::fals())),
        NodeKind::StaticString(content) => {
            let desc = data.intern_string(content);
            Ok(code.append(Instruction::sload(desc.as_u32())))
        }
        NodeKind::Integer(value) => {
            if let Ok(narrow) = i32::try_from(*value) {
                Ok(code.append(Instruction::iload32(narrow)))
            } else {
                let bits = *value as u64;
                let low = bits as u32;
                let high = (bits >> 32) as u32;
                let first = code.append(Instruction::arg(low));
                code.append(Instruction::iload64(high));
                Ok(first)
            }
        }
        NodeKind::Real(value) => {
            let bits = value.to_bits();
            let low = bits as u32;
            let high = (bits >> 32) as u32;
            let first = code.append(Instruction::arg(low));
            code.append(Instruction::rload(high));
            Ok(first)
        }
        NodeKind::Variable(name) => {
            let desc = data.intern_string(name);
            Ok(code.append(Instruction::vload(desc.as_u32())))
        }
        NodeKind::ParenExpr(inner) => emit_bytecode(arena, *inner, code, data, ctx),
        NodeKind::FunctionObject { params, body } => {
            if params.len() >= MAX_ARGUMENT_COUNT {
                return Err(CompileError::TooManyArguments { found: params.len() });
            }
            // Placeholder entry index; patched once the body is compiled by
            // `emit_deferred_bodies`.
            let entry_arg = code.append(Instruction::arg(0));
            let names_desc = data.append_string_array(params);
            code.append(Instruction::func(params.len() as u16, names_desc.as_u32()));
            ctx.defer_body(entry_arg, *body);
            Ok(entry_arg)
        }
        NodeKind::FunctionCall { callee, args } => {
            if args.len() >= MAX_ARGUMENT_COUNT {
                return Err(CompileError::TooManyArguments { found: args.len() });
            }
            let mut first = None;
            for &arg in args.iter().rev() {
                let idx = emit_bytecode(arena, arg, code, data, ctx)?;
                first.get_or_insert(idx);
            }
            let callee_idx = emit_bytecode(arena, *callee, code, data, ctx)?;
            first.get_or_insert(callee_idx);
            code.append(Instruction::call(args.len() as u16));
            Ok(first.expect("at least the callee was emitted"))
        }
        NodeKind::SimpleAssignment { target, value } => {
            let value_idx = emit_bytecode(arena, *value, code, data, ctx)?;
            emit_bytecode_assign(arena, *target, code, data);
            Ok(value_idx)
        }
        NodeKind::StatementExpression(expr) => {
            let first = emit_bytecode(arena, *expr, code, data, ctx)?;
            code.append(Instruction::pop());
            Ok(first)
        }
        NodeKind::VariableDeclaration(declarators) | NodeKind::ConstantDeclaration(declarators) => {
            let mut first = None;
            for &declarator in declarators {
                let idx = emit_bytecode(arena, declarator, code, data, ctx)?;
                first.get_or_insert(idx);
            }
            Ok(first.unwrap_or_else(|| code.next_index()))
        }
        NodeKind::VariableDeclarator { name, initial } => {
            let first = match initial {
                Some(init) => emit_bytecode(arena, *init, code, data, ctx)?,
                None => code.append(Instruction::nil()),
            };
            code.append(Instruction::pop());
            let desc = data.intern_string(name);
            code.append(Instruction::var(desc.as_u32()));
            Ok(first)
        }
        NodeKind::ConstantDeclarator { name, initial } => {
            let first = emit_bytecode(arena, *initial, code, data, ctx)?;
            code.append(Instruction::pop());
            let desc = data.intern_string(name);
            code.append(Instruction::constant(desc.as_u32()));
            Ok(first)
        }
        NodeKind::Return(value) => {
            let first = match value {
                Some(v) => emit_bytecode(arena, *v, code, data, ctx)?,
                None => code.append(Instruction::nil()),
            };
            code.append(Instruction::ret());
            Ok(first)
        }
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
        | NodeKind::NotEqual(..) => unreachable!("handled by binary_opcode above"),
    }
}

/// Emit the store lowering for `id`, assuming the value to store is already
/// on top of the data stack.
///
/// Panics if `id` is not an assignable node (currently, anything but
/// [`NodeKind::Variable`]): calling this on a non-assignable node is always
/// a bug in the caller, never something malformed user input can trigger —
/// the parser is expected to reject `1 = 2;` long before this crate sees it.
pub fn emit_bytecode_assign(arena: &Arena, id: NodeId, code: &mut CodeBuilder, data: &mut DataBuilder) -> InstrIndex {
    let node = arena.get(id);
    match node.kind() {
        NodeKind::Variable(name) => {
            let desc = data.intern_string(name);
            code.append(Instruction::store(desc.as_u32()))
        }
        _ => panic!("emit_bytecode_assign called on non-assignable node `{}`", node.type_tag()),
    }
}

/// Drain every function body queued in `ctx`, patching each one's
/// placeholder `ARG` with the real entry index and compiling its bytecode.
///
/// Draining a body can itself enqueue further bodies (a closure defined
/// inside another function), so this loops until the queue is empty rather
/// than processing one fixed pass.
#[tracing::instrument(level = "debug", skip_all)]
pub fn emit_deferred_bodies(
    arena: &Arena,
    code: &mut CodeBuilder,
    data: &mut DataBuilder,
    ctx: &mut EmitContext,
) -> Result<(), CompileError> {
    while let Some((entry_patch_target, body)) = ctx.pending.pop_front() {
        let entry = code.next_index();
        code.patch_arg1(entry_patch_target, index_to_arg1(entry));
        emit_bytecode(arena, body, code, data, ctx)?;
    }
    Ok(())
}

/// Emit a complete program: the root node's own lowering, followed by every
/// function body it (transitively) deferred.
///
/// This is the single entry point a driver needs: [`EmitContext`] is created
/// and drained internally, so callers never have to remember the two-phase
/// protocol themselves.
pub fn emit_program(
    arena: &Arena,
    root: NodeId,
    code: &mut CodeBuilder,
    data: &mut DataBuilder,
) -> Result<InstrIndex, CompileError> {
    let mut ctx = EmitContext::new();
    let start = emit_bytecode(arena, root, code, data, &mut ctx)?;
    emit_deferred_bodies(arena, code, data, &mut ctx)?;
    Ok(start)
}

#[cfg(test)]
mod tests {
    use goat_codegen::Config;

    use super::*;

    fn setup() -> (Arena, CodeBuilder, DataBuilder) {
        let config = Config::default();
        (Arena::new(&config), CodeBuilder::new(&config), DataBuilder::new(&config))
    }

    #[test]
    fn e1_addition_statement() {
        let (mut arena, mut code, mut data) = setup();
        let two = arena.alloc(NodeKind::Integer(2));
        let three = arena.alloc(NodeKind::Integer(3));
        let add = arena.alloc(NodeKind::Addition(two, three));
        let stmt = arena.alloc(NodeKind::StatementExpression(add));
        let root = arena.alloc(NodeKind::Root(vec![stmt]));

        emit_program(&arena, root, &mut code, &mut data).unwrap();
        let ops: Vec<Opcode> = code.view().iter().map(|i| i.opcode()).collect();
        assert_eq!(
            ops,
            vec![Opcode::Iload32, Opcode::Iload32, Opcode::Add, Opcode::Pop, Opcode::End]
        );
    }

    #[test]
    fn e2_call_with_string_and_identifier() {
        let (mut arena, mut code, mut data) = setup();
        let callee = arena.alloc(NodeKind::Variable("print".into()));
        let arg = arena.alloc(NodeKind::StaticString("test".into()));
        let call = arena.alloc(NodeKind::FunctionCall {
            callee,
            args: vec![arg],
        });
        let stmt = arena.alloc(NodeKind::StatementExpression(call));
        let root = arena.alloc(NodeKind::Root(vec![stmt]));

        emit_program(&arena, root, &mut code, &mut data).unwrap();
        let ops: Vec<Opcode> = code.view().iter().map(|i| i.opcode()).collect();
        assert_eq!(
            ops,
            vec![Opcode::Sload, Opcode::Vload, Opcode::Call, Opcode::Pop, Opcode::End]
        );
        assert_eq!(code.view()[2].arg0(), 1);
    }

    #[test]
    fn e3_variable_declarators_with_and_without_initializer() {
        let (mut arena, mut code, mut data) = setup();
        let five = arena.alloc(NodeKind::Integer(5));
        let x = arena.alloc(NodeKind::VariableDeclarator {
            name: "x".into(),
            initial: Some(five),
        });
        let y = arena.alloc(NodeKind::VariableDeclarator {
            name: "y".into(),
            initial: None,
        });
        let decl = arena.alloc(NodeKind::VariableDeclaration(vec![x, y]));
        let root = arena.alloc(NodeKind::Root(vec![decl]));

        emit_program(&arena, root, &mut code, &mut data).unwrap();
        let ops: Vec<Opcode> = code.view().iter().map(|i| i.opcode()).collect();
        assert_eq!(
            ops,
            vec![
                Opcode::Iload32,
                Opcode::Pop,
                Opcode::Var,
                Opcode::Nil,
                Opcode::Pop,
                Opcode::Var,
                Opcode::End,
            ]
        );
    }

    #[test]
    fn e4_nested_block_brackets_with_enter_leave() {
        let (mut arena, mut code, mut data) = setup();
        let one = arena.alloc(NodeKind::Integer(1));
        let two = arena.alloc(NodeKind::Integer(2));
        let s1 = arena.alloc(NodeKind::StatementExpression(one));
        let s2 = arena.alloc(NodeKind::StatementExpression(two));
        let block = arena.alloc(NodeKind::StatementList(vec![s1, s2]));
        let root = arena.alloc(NodeKind::Root(vec![block]));

        emit_program(&arena, root, &mut code, &mut data).unwrap();
        let ops: Vec<Opcode> = code.view().iter().map(|i| i.opcode()).collect();
        assert_eq!(
            ops,
            vec![
                Opcode::Enter,
                Opcode::Iload32,
                Opcode::Pop,
                Opcode::Iload32,
                Opcode::Pop,
                Opcode::Leave,
                Opcode::End,
            ]
        );
    }

    #[test]
    fn e5_large_integer_splits_into_arg_and_iload64() {
        let (mut arena, mut code, mut data) = setup();
        let value: i64 = 10_000_000_000;
        let lit = arena.alloc(NodeKind::Integer(value));
        let stmt = arena.alloc(NodeKind::StatementExpression(lit));
        let root = arena.alloc(NodeKind::Root(vec![stmt]));

        emit_program(&arena, root, &mut code, &mut data).unwrap();
        let ops: Vec<Opcode> = code.view().iter().map(|i| i.opcode()).collect();
        assert_eq!(ops, vec![Opcode::Arg, Opcode::Iload64, Opcode::Pop, Opcode::End]);

        let low = code.view()[0].arg1();
        let high = code.view()[1].arg1();
        let recombined = ((high as u64) << 32) | low as u64;
        assert_eq!(recombined as i64, value);
    }

    #[test]
    fn e6_assignment_to_variable() {
        let (mut arena, mut code, mut data) = setup();
        let b = arena.alloc(NodeKind::Variable("b".into()));
        let c = arena.alloc(NodeKind::Variable("c".into()));
        let sum = arena.alloc(NodeKind::Addition(b, c));
        let a = arena.alloc(NodeKind::Variable("a".into()));
        let assign = arena.alloc(NodeKind::SimpleAssignment { target: a, value: sum });
        let stmt = arena.alloc(NodeKind::StatementExpression(assign));
        let root = arena.alloc(NodeKind::Root(vec![stmt]));

        emit_program(&arena, root, &mut code, &mut data).unwrap();
        let ops: Vec<Opcode> = code.view().iter().map(|i| i.opcode()).collect();
        assert_eq!(
            ops,
            vec![Opcode::Vload, Opcode::Vload, Opcode::Add, Opcode::Store, Opcode::Pop, Opcode::End]
        );
    }

    #[test]
    fn function_body_is_deferred_past_the_root_end() {
        let (mut arena, mut code, mut data) = setup();
        let body_stmt_value = arena.alloc(NodeKind::Integer(1));
        let body_stmt = arena.alloc(NodeKind::StatementExpression(body_stmt_value));
        let body = arena.alloc(NodeKind::StatementList(vec![body_stmt]));
        let func = arena.alloc(NodeKind::FunctionObject {
            params: vec!["x".into()],
            body,
        });
        let decl = arena.alloc(NodeKind::ConstantDeclarator {
            name: "f".into(),
            initial: func,
        });
        let decls = arena.alloc(NodeKind::ConstantDeclaration(vec![decl]));
        let root = arena.alloc(NodeKind::Root(vec![decls]));

        emit_program(&arena, root, &mut code, &mut data).unwrap();
        let ops: Vec<Opcode> = code.view().iter().map(|i| i.opcode()).collect();
        let end_pos = ops.iter().position(|&o| o == Opcode::End).unwrap();
        assert!(ops[..end_pos].iter().all(|&o| o != Opcode::Enter));

        let func_pos = ops.iter().position(|&o| o == Opcode::Func).unwrap();
        let entry_index = code.view()[func_pos - 1].arg1();
        assert_eq!(entry_index as usize, end_pos + 1);
        assert_eq!(ops[entry_index as usize], Opcode::Enter);
    }

    #[test]
    fn call_rejects_argument_counts_at_the_u16_limit() {
        let (mut arena, mut code, mut data) = setup();
        let callee = arena.alloc(NodeKind::Variable("f".into()));
        let args: Vec<NodeId> = (0..65536).map(|_| arena.alloc(NodeKind::Null)).collect();
        let call = arena.alloc(NodeKind::FunctionCall { callee, args });

        let mut ctx = EmitContext::new();
        let result = emit_bytecode(&arena, call, &mut code, &mut data, &mut ctx);
        assert_eq!(result, Err(CompileError::TooManyArguments { found: 65536 }));
    }
}
