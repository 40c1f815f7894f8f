use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

#[derive(Clone)]
enum ContextKind {
  Immediate,
  NonRecursive(Arc<AtomicBool>),
}

/// A policy for running a block synchronously.
///
/// Contexts wrap subscriber callbacks where plain invocation is not
/// enough; the set is closed because the core only needs these two.
#[derive(Clone)]
pub struct ExecutionContext {
  kind: ContextKind,
}

impl ExecutionContext {
  /// Executes immediately on the current thread.
  pub fn immediate() -> Self {
    ExecutionContext { kind: ContextKind::Immediate }
  }

  /// Breaks recursive invocations by dropping them: while a block runs in
  /// this context, any nested or concurrent invocation is ignored instead
  /// of deadlocking. This is what makes bidirectional binding safe.
  pub fn non_recursive() -> Self {
    ExecutionContext {
      kind: ContextKind::NonRecursive(Arc::new(AtomicBool::new(false))),
    }
  }

  /// Run `block` under the context's policy.
  pub fn execute(&self, block: impl FnOnce()) {
    match &self.kind {
      ContextKind::Immediate => block(),
      ContextKind::NonRecursive(running) => {
        if running
          .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
          .is_ok()
        {
          block();
          running.store(false, Ordering::Release);
        }
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::cell::Cell;

  #[test]
  fn immediate_executes() {
    let ran = Cell::new(false);
    ExecutionContext::immediate().execute(|| ran.set(true));
    assert!(ran.get());
  }

  #[test]
  fn non_recursive_drops_nested_invocations() {
    let context = ExecutionContext::non_recursive();
    let outer = Cell::new(0);
    let inner = Cell::new(0);
    context.execute(|| {
      outer.set(outer.get() + 1);
      context.execute(|| inner.set(inner.get() + 1));
    });
    assert_eq!(outer.get(), 1);
    assert_eq!(inner.get(), 0);
  }

  #[test]
  fn non_recursive_runs_again_after_completion() {
    let context = ExecutionContext::non_recursive();
    let count = Cell::new(0);
    context.execute(|| count.set(count.get() + 1));
    context.execute(|| count.set(count.get() + 1));
    assert_eq!(count.get(), 2);
  }
}
