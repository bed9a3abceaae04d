//! Epoch hooks
//!
//! The epoch-timing subsystem announces two events per epoch cycle:
//! `before_epoch_start` and `after_epoch_end`. Modules that react to them
//! implement [`EpochHooks`] and are registered, in order, in an
//! [`EpochHookList`] assembled by the host. There is no global registry.
//!
//! Each hook is responsible for filtering on its own epoch identifier;
//! the list forwards every event to every hook.

use anyhow::{Context, Result};
use epochmint_types::EpochNumber;
use tracing::debug;

/// Common epoch identifiers.
pub mod identifiers {
    pub const DAY: &str = "day";
    pub const WEEK: &str = "week";
}

/// Reaction to epoch boundaries.
///
/// `C` is the host's state-transition context: whatever the hook needs to
/// reach ledgers and other collaborators for the current step.
pub trait EpochHooks<C> {
    /// Short name used in logs and error context.
    fn name(&self) -> &str;

    fn before_epoch_start(
        &mut self,
        ctx: &mut C,
        identifier: &str,
        epoch_number: EpochNumber,
    ) -> Result<()>;

    fn after_epoch_end(
        &mut self,
        ctx: &mut C,
        identifier: &str,
        epoch_number: EpochNumber,
    ) -> Result<()>;
}

/// Ordered set of hooks, invoked sequentially in registration order.
pub struct EpochHookList<C> {
    hooks: Vec<Box<dyn EpochHooks<C>>>,
}

impl<C> EpochHookList<C> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Builder-style registration.
    pub fn with_hook(mut self, hook: Box<dyn EpochHooks<C>>) -> Self {
        self.push(hook);
        self
    }

    pub fn push(&mut self, hook: Box<dyn EpochHooks<C>>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Names of the registered hooks, in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Forward `before_epoch_start` to every hook. Stops at the first failure.
    pub fn before_epoch_start(
        &mut self,
        ctx: &mut C,
        identifier: &str,
        epoch_number: EpochNumber,
    ) -> Result<()> {
        for hook in self.hooks.iter_mut() {
            debug!(
                target: "epochs",
                "before_epoch_start {} #{} -> {}",
                identifier,
                epoch_number,
                hook.name()
            );
            hook.before_epoch_start(ctx, identifier, epoch_number)
                .with_context(|| {
                    format!(
                        "hook {} failed in before_epoch_start({identifier}, {epoch_number})",
                        hook.name()
                    )
                })?;
        }
        Ok(())
    }

    /// Forward `after_epoch_end` to every hook. Stops at the first failure;
    /// the host treats that as fatal for the current step.
    pub fn after_epoch_end(
        &mut self,
        ctx: &mut C,
        identifier: &str,
        epoch_number: EpochNumber,
    ) -> Result<()> {
        for hook in self.hooks.iter_mut() {
            debug!(
                target: "epochs",
                "after_epoch_end {} #{} -> {}",
                identifier,
                epoch_number,
                hook.name()
            );
            hook.after_epoch_end(ctx, identifier, epoch_number)
                .with_context(|| {
                    format!(
                        "hook {} failed in after_epoch_end({identifier}, {epoch_number})",
                        hook.name()
                    )
                })?;
        }
        Ok(())
    }
}

impl<C> Default for EpochHookList<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    /// Context that records which hook saw which event.
    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
    }

    struct Recorder {
        name: &'static str,
        track: &'static str,
        fail_on: Option<EpochNumber>,
    }

    impl EpochHooks<Trace> for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn before_epoch_start(
            &mut self,
            ctx: &mut Trace,
            identifier: &str,
            epoch_number: EpochNumber,
        ) -> Result<()> {
            if identifier == self.track {
                ctx.events.push(format!("{}:start:{}", self.name, epoch_number));
            }
            Ok(())
        }

        fn after_epoch_end(
            &mut self,
            ctx: &mut Trace,
            identifier: &str,
            epoch_number: EpochNumber,
        ) -> Result<()> {
            if identifier != self.track {
                return Ok(());
            }
            if self.fail_on == Some(epoch_number) {
                bail!("boom");
            }
            ctx.events.push(format!("{}:end:{}", self.name, epoch_number));
            Ok(())
        }
    }

    fn recorder(name: &'static str, track: &'static str) -> Box<dyn EpochHooks<Trace>> {
        Box::new(Recorder {
            name,
            track,
            fail_on: None,
        })
    }

    #[test]
    fn hooks_run_in_registration_order() {
        let mut list = EpochHookList::new()
            .with_hook(recorder("a", identifiers::WEEK))
            .with_hook(recorder("b", identifiers::WEEK));
        let mut ctx = Trace::default();

        list.before_epoch_start(&mut ctx, identifiers::WEEK, 3).unwrap();
        list.after_epoch_end(&mut ctx, identifiers::WEEK, 3).unwrap();

        assert_eq!(ctx.events, vec!["a:start:3", "b:start:3", "a:end:3", "b:end:3"]);
        assert_eq!(list.names(), vec!["a", "b"]);
    }

    #[test]
    fn each_hook_filters_its_own_identifier() {
        let mut list = EpochHookList::new()
            .with_hook(recorder("weekly", identifiers::WEEK))
            .with_hook(recorder("daily", identifiers::DAY));
        let mut ctx = Trace::default();

        list.after_epoch_end(&mut ctx, identifiers::DAY, 1).unwrap();
        assert_eq!(ctx.events, vec!["daily:end:1"]);
    }

    #[test]
    fn first_failure_stops_dispatch_and_names_the_hook() {
        let mut list = EpochHookList::new()
            .with_hook(Box::new(Recorder {
                name: "flaky",
                track: identifiers::WEEK,
                fail_on: Some(2),
            }))
            .with_hook(recorder("after", identifiers::WEEK));
        let mut ctx = Trace::default();

        let err = list
            .after_epoch_end(&mut ctx, identifiers::WEEK, 2)
            .unwrap_err();
        assert!(format!("{err:#}").contains("hook flaky failed"));
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn empty_list_is_a_noop() {
        let mut list: EpochHookList<Trace> = EpochHookList::default();
        let mut ctx = Trace::default();
        assert!(list.is_empty());
        list.after_epoch_end(&mut ctx, identifiers::WEEK, 1).unwrap();
        assert!(ctx.events.is_empty());
    }
}
