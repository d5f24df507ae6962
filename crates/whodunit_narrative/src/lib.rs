//! Murder-mystery writing workflow.
//!
//! A [`MysteryWorkflow`] walks a [`WorkflowSession`] through four stages,
//! each one a completion call: the idea, the chapter outline, one draft per
//! chapter, and an editorial critique. The finished session compiles into a
//! [`Manuscript`].

mod brief;
mod manuscript;
mod outline;
pub mod prompts;
mod session;
mod workflow;

pub use brief::{CastMember, MysteryBrief, MysteryBriefBuilder};
pub use manuscript::{Manuscript, ManuscriptFormat};
pub use outline::{ChapterPlan, Outline};
pub use session::{ChapterDraft, Stage, WorkflowSession};
pub use workflow::{GenerationSettings, GenerationSettingsBuilder, MysteryWorkflow};
