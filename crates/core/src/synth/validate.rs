use rustpython_ast::Visitor;
use rustpython_parser::{ast, parse, Mode};

/// Check that `code` parses as Python 3 source.
///
/// Only syntax is checked. Any parse error makes the code invalid, as do the
/// few rules CPython enforces after parsing: deleting something that is not
/// a target, and an unparenthesized generator next to other call arguments.
/// This never panics on malformed input. An empty string is a valid (empty)
/// module.
pub fn is_valid_python(code: &str) -> bool {
    let Ok(ast::Mod::Module(module)) = parse(code, Mode::Module, "<generated>") else {
        return false;
    };

    let mut checks = TargetChecks {
        source: code,
        valid: true,
    };
    for stmt in module.body {
        checks.visit_stmt(stmt);
    }

    checks.valid
}

struct TargetChecks<'a> {
    source: &'a str,
    valid: bool,
}

impl Visitor for TargetChecks<'_> {
    fn visit_stmt_delete(&mut self, node: ast::StmtDelete) {
        if !node.targets.iter().all(is_deletable) {
            self.valid = false;
        }
        self.generic_visit_stmt_delete(node);
    }

    fn visit_expr_call(&mut self, node: ast::ExprCall) {
        if node.args.len() + node.keywords.len() > 1 {
            let bare_generator = node.args.iter().any(|arg| match arg {
                ast::Expr::GeneratorExp(generator) => {
                    let start = usize::from(generator.range.start());
                    !self
                        .source
                        .get(start..)
                        .is_some_and(|rest| rest.starts_with('('))
                }
                _ => false,
            });

            if bare_generator {
                self.valid = false;
            }
        }
        self.generic_visit_expr_call(node);
    }
}

fn is_deletable(target: &ast::Expr) -> bool {
    match target {
        ast::Expr::Name(_) | ast::Expr::Attribute(_) | ast::Expr::Subscript(_) => true,
        ast::Expr::Tuple(tuple) => tuple.elts.iter().all(is_deletable),
        ast::Expr::List(list) => list.elts.iter().all(is_deletable),
        _ => false,
    }
}
