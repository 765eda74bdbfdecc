use super::*;

fn nesting_depth(n: u64) -> u64 {
    ensure_sufficient_stack(|| if n == 0 { 0 } else { nesting_depth(n - 1) + 1 })
}

#[test]
fn shallow_recursion() {
    assert_eq!(nesting_depth(10), 10);
}

#[test]
fn deep_recursion_does_not_overflow() {
    assert_eq!(nesting_depth(100_000), 100_000);
}

#[test]
fn passes_results_through() {
    let result: Result<u32, &str> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}
