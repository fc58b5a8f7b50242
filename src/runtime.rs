// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// What a viewport resize does to the running columns.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Recompute the column count and reseed every column.
    #[default]
    #[value(name = "reinit")]
    Reinit,
    /// Resize the surface only; existing columns keep falling, new width gains none.
    #[value(name = "preserve")]
    Preserve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Ice,
    Green,
    Amber,
    Red,
    Purple,
    Mono,
}
