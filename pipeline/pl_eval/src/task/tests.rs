use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_with_val_respects_replace_flag() {
    let funcs = FnTable::new();
    let mut task = Task::new(&funcs, None);
    assert!(task.with_val("source", Arc::new("nginx".to_string()), false));
    assert!(!task.with_val("source", Arc::new("redis".to_string()), false));
    assert_eq!(task.private::<String>("source").map(String::as_str), Some("nginx"));

    assert!(task.with_val("source", Arc::new("redis".to_string()), true));
    assert_eq!(task.private::<String>("source").map(String::as_str), Some("redis"));
}

#[test]
fn test_private_requires_matching_type() {
    let funcs = FnTable::new();
    let mut task = Task::new(&funcs, None);
    task.with_val("limit", Arc::new(10_u32), false);
    assert_eq!(task.private::<u32>("limit"), Some(&10));
    assert_eq!(task.private::<i64>("limit"), None);
    assert_eq!(task.private::<u32>("missing"), None);
}

#[test]
fn test_signal_latches_exit() {
    let funcs = FnTable::new();
    let signal = AtomicBool::new(false);
    let mut task = Task::new(&funcs, Some(&signal));
    assert!(!task.should_unwind());

    signal.store(true, Ordering::Relaxed);
    assert!(task.should_unwind());
    assert!(task.exited());

    // stays latched after the signal clears
    signal.store(false, Ordering::Relaxed);
    assert!(task.should_unwind());
}

#[test]
fn test_loop_flags_unwind() {
    let funcs = FnTable::new();
    let mut task = Task::new(&funcs, None);
    task.loop_break = true;
    assert!(task.should_unwind());
    task.loop_break = false;
    task.loop_continue = true;
    assert!(task.should_unwind());
    task.loop_continue = false;
    assert!(!task.should_unwind());
    assert!(!task.exited());
}

#[test]
fn test_child_inherits_context_not_scope() {
    let funcs = FnTable::new();
    let signal = AtomicBool::new(false);
    let mut parent = Task::new(&funcs, Some(&signal));
    parent.with_val("k", Arc::new(1_i32), false);
    parent.set_var("x", Value::Int(1));

    let other = FnTable::new();
    let child = parent.child(&other);
    assert_eq!(child.private::<i32>("k"), Some(&1));
    assert_eq!(child.get_var("x"), None);
    assert!(child.signal().is_some());
}

#[test]
fn test_set_exit() {
    let funcs = FnTable::new();
    let mut task = Task::new(&funcs, None);
    task.set_exit();
    assert!(task.exited());
    assert!(task.should_unwind());
}
