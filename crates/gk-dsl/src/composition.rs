use crate::{ApplyError, Section};

/// Resolve a child configuration of the parent target.
///
/// Resolving is allowed to activate the child (e.g. create it with its own
/// defaults the first time it is asked for).
pub type Scope<P, T> = fn(&mut P) -> &mut T;

trait Step<P: ?Sized> {
    fn run(&self, parent: &mut P) -> Result<(), ApplyError>;
}

struct Scoped<P: ?Sized, T: ?Sized, S> {
    scope: Scope<P, T>,
    section: S,
}

impl<P: ?Sized, T: ?Sized, S: Section<T>> Step<P> for Scoped<P, T, S> {
    fn run(&self, parent: &mut P) -> Result<(), ApplyError> {
        self.section.apply((self.scope)(parent))
    }
}

/// Ordered list of sections applied to one shared parent target.
///
/// Sections run in the order they were added, since a later section may
/// override what an earlier one did to the same target. `build` consumes
/// the root, so a root is applied at most once.
///
/// There is no atomicity across sections: when one fails, the sections
/// before it stay applied to the target and the ones after it never run.
pub struct CompositionRoot<'a, P: ?Sized> {
    steps: Vec<(&'static str, Box<dyn Step<P> + 'a>)>,
}

impl<'a, P: ?Sized + 'a> Default for CompositionRoot<'a, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, P: ?Sized + 'a> CompositionRoot<'a, P> {
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a section applied to the child returned by `scope`.
    #[must_use]
    pub fn section<T, S>(mut self, name: &'static str, scope: Scope<P, T>, section: S) -> Self
    where
        T: ?Sized + 'a,
        S: Section<T> + 'a,
    {
        self.steps
            .push((name, Box::new(Scoped { scope, section })));
        self
    }

    /// Section names in application order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(name, _)| *name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every section to `target` in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first section failure wrapped in [`ApplyError::Section`].
    /// The target keeps whatever the earlier sections wrote.
    pub fn build(self, target: &mut P) -> Result<(), ApplyError> {
        for (name, step) in self.steps {
            tracing::debug!(section = name, "applying configuration section");
            step.run(target).map_err(|source| {
                tracing::warn!(
                    section = name,
                    error = %source,
                    "configuration section rejected; remaining sections skipped"
                );
                ApplyError::Section {
                    section: name,
                    source: Box::new(source),
                }
            })?;
        }
        Ok(())
    }
}
