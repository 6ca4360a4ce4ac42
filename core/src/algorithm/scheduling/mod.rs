//! Project scheduling over precedence-constrained task networks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod critical_path;

pub use self::critical_path::{
    critical_path, CriticalPathMethod, Duration, Schedule, ScheduleEntry, ScheduleNode, Task, TaskId,
};
