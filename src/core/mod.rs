pub mod architect;
pub mod archetypes;
pub mod blueprint;
pub mod drafter;
pub mod guidance;
pub mod marketing;
pub mod pipeline;
pub mod template;
pub mod text;
