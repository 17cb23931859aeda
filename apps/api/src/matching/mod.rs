// Skill → job matching engine.
// Pipeline: normalize input → fetch snapshot → score each domain → rank → assemble.
// Only the snapshot fetch does I/O; everything after it is pure.

pub mod engine;
pub mod handlers;
pub mod normalizer;
pub mod provider;
pub mod ranker;
pub mod scorer;
pub mod taxonomy;
