/// Highest supported detail level. Resolution at this level is `4 * 2^4 = 64`.
pub const MAX_DETAIL_LEVEL: u32 = 4;

/// What the context does when a call violates a precondition.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Validation {
    /// Return the error to the caller. State is left untouched.
    #[default]
    Report,
    /// Log the failure and panic with a descriptive message.
    ///
    /// Intended for development builds where a protocol or capacity error is
    /// always a bug. `Culled` is never escalated.
    Abort,
}

/// Context configuration, fixed for the lifetime of a [`Context`](crate::Context).
///
/// Capacities are hard limits: buffers are allocated once and never grow.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Vertex buffer capacity.
    pub max_vertices: usize,
    /// Command buffer capacity.
    pub max_commands: usize,
    /// Font table capacity.
    pub max_fonts: usize,
    /// Initial tessellation detail level, clamped to `0..=MAX_DETAIL_LEVEL`.
    pub detail_level: u32,
    /// Anti-aliasing falloff for lines and points, in pixels. Consumed by backends.
    pub line_antialias_radius: f32,
    /// Initial state of frustum culling.
    pub enable_frustum_cull: bool,
    /// Initial state of depth testing.
    pub enable_depth_test: bool,
    pub validation: Validation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_vertices: 64 * 1024,
            max_commands: 1024,
            max_fonts: 8,
            detail_level: 2,
            line_antialias_radius: 2.0,
            enable_frustum_cull: true,
            enable_depth_test: true,
            validation: Validation::Report,
        }
    }
}

impl Config {
    pub fn with_capacity(mut self, max_vertices: usize, max_commands: usize) -> Self {
        self.max_vertices = max_vertices;
        self.max_commands = max_commands;
        self
    }

    pub fn with_max_fonts(mut self, max_fonts: usize) -> Self {
        self.max_fonts = max_fonts;
        self
    }

    pub fn with_detail_level(mut self, level: u32) -> Self {
        self.detail_level = level.min(MAX_DETAIL_LEVEL);
        self
    }

    pub fn with_line_antialias_radius(mut self, radius: f32) -> Self {
        self.line_antialias_radius = radius.max(0.0);
        self
    }

    pub fn with_frustum_cull(mut self, enabled: bool) -> Self {
        self.enable_frustum_cull = enabled;
        self
    }

    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.enable_depth_test = enabled;
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_level_is_clamped() {
        let c = Config::default().with_detail_level(9);
        assert_eq!(c.detail_level, MAX_DETAIL_LEVEL);
    }

    #[test]
    fn builder_sets_capacities() {
        let c = Config::default().with_capacity(1024, 16);
        assert_eq!((c.max_vertices, c.max_commands), (1024, 16));
    }
}
