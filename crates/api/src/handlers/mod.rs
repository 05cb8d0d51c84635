pub mod ai;
pub mod calendar;
pub mod canvas;
pub mod dashboard;
pub mod intents;
pub mod nodes;
pub mod scheduling;
