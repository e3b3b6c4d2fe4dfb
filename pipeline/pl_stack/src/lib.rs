//! Stack growth for the recursive evaluator.
//!
//! Script trees are evaluated by direct recursion: nested parentheses,
//! long `a + b + c + ...` chains and deeply nested blocks each add native
//! frames. Worker threads that run pipelines often have small stacks, so
//! every recursive step of the evaluator goes through
//! [`ensure_sufficient_stack`], which moves execution onto a freshly
//! allocated segment when the current one is close to exhausted.
//!
//! On `wasm32` the guard is a plain call.

/// Remaining stack below which a new segment is allocated.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Expr {
        Lit(i64),
        Neg(Box<Expr>),
    }

    fn eval(expr: &Expr) -> i64 {
        ensure_sufficient_stack(|| match expr {
            Expr::Lit(n) => *n,
            Expr::Neg(inner) => -eval(inner),
        })
    }

    fn nested(depth: usize) -> Expr {
        let mut expr = Expr::Lit(7);
        for _ in 0..depth {
            expr = Expr::Neg(Box::new(expr));
        }
        expr
    }

    fn drop_iteratively(mut expr: Expr) {
        while let Expr::Neg(inner) = expr {
            expr = *inner;
        }
    }

    #[test]
    fn test_shallow_tree() {
        let expr = nested(3);
        assert_eq!(eval(&expr), -7);
        drop_iteratively(expr);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        // far deeper than a default 2MB test thread can recurse unaided
        let expr = nested(200_000);
        assert_eq!(eval(&expr), 7);
        drop_iteratively(expr);
    }

    #[test]
    fn test_passes_results_through() {
        let r: Result<u8, String> = ensure_sufficient_stack(|| Err("boom".to_string()));
        assert_eq!(r, Err("boom".to_string()));
    }
}
