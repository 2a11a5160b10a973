//! Domain layer - Core study-assistant objects with no I/O
//! 
//! This layer contains:
//! - Entities: Rules, conversation log, countdown timer, tasks, study sessions
//! - Traits: Abstractions for infrastructure (Bot, StudyApi, Notifier)

pub mod entities;
pub mod traits;
