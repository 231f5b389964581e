use crate::estimate::GeometricFitError;

/// Which of the two registered graphs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GraphSide {
    A,
    B,
}

/// Errors raised while building a spatial registration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    #[error(
        "Spatial registration needs at least {required} paired root cells, \
         but only {found} were found"
    )]
    InsufficientPairedRoots { found: usize, required: usize },

    #[error(
        "Spatial registration needs at least {required} landmark tags present in both graphs, \
         but only {found} were usable. Tags in A: [{}]. Tags in B: [{}]. Unusable: [{}]",
        .labels_a.join(", "),
        .labels_b.join(", "),
        .unmatched.join(", ")
    )]
    InsufficientPairedLandmarks {
        found: usize,
        required: usize,
        labels_a: Vec<String>,
        labels_b: Vec<String>,
        /// Labels missing on one side or without tagged cells on one side.
        unmatched: Vec<String>,
    },

    #[error("Graph {side} (\"{graph}\") has no tag set named \"{name}\"")]
    MissingTagSet {
        side: GraphSide,
        graph: String,
        name: String,
    },

    #[error("Failed to fit similarity transform: {0}")]
    GeometricFit(#[from] GeometricFitError),
}
