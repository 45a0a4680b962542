//! Mascot construction.

use crate::config::{Environment, MascotOptions, ProcessEnvironment, RandomDelay, uniform_delay};

use super::Mascot;
use super::controller::MascotInner;

/// Builder for [`Mascot`].
///
/// ```ignore
/// let mascot = Mascot::builder()
///     .options(MascotOptions::default().with_clamp(10.0, 8.0))
///     .environment(StaticEnvironment::default())
///     .random_delay(min_delay())
///     .build();
/// ```
pub struct MascotBuilder {
    options: MascotOptions,
    environment: Box<dyn Environment>,
    random_delay: RandomDelay,
}

impl MascotBuilder {
    pub fn new() -> Self {
        Self {
            options: MascotOptions::default(),
            environment: Box::new(ProcessEnvironment),
            random_delay: uniform_delay(),
        }
    }

    pub fn options(mut self, options: MascotOptions) -> Self {
        self.options = options;
        self
    }

    /// Where reduced-motion and touch are detected at mount when the options
    /// leave them unset.
    pub fn environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    pub fn random_delay(mut self, random_delay: RandomDelay) -> Self {
        self.random_delay = random_delay;
        self
    }

    pub fn build(self) -> Mascot {
        Mascot {
            inner: MascotInner::new(self.options, self.environment, self.random_delay),
        }
    }
}

impl Default for MascotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
