// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod edit_interactor;
pub mod inspect_interactor;
pub mod session;

// Re-export interactors
pub use batch_interactor::{BatchInteractor, IntermediateWorkspace};
pub use edit_interactor::EditInteractor;
pub use inspect_interactor::InspectInteractor;
pub use session::{BatchOutcome, BatchState, EditSession};
