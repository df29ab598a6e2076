//! TalentFlow Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! Jobs, candidates, the stage pipeline, filters (which double as cache-key
//! parameters), mutation intents, and the error taxonomy.

pub mod entities;
pub mod enums;
pub mod error;
pub mod filter;
pub mod identity;
pub mod intent;

pub use entities::{Candidate, Job, NewJob, TimelineEvent};
pub use enums::{Collection, JobStatus, Stage, StageParseError};
pub use error::{EngineError, GatewayError, StoreError, TalentFlowError, TalentFlowResult};
pub use filter::{CacheKey, CandidateFilter, JobFilter};
pub use identity::{new_entity_id, CandidateId, EntityId, EventId, JobId, Timestamp};
pub use intent::{CandidateIntent, JobEdit, JobIntent};
