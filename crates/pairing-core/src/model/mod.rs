pub mod bye_queue;
pub mod history;
pub mod player;
pub mod roster;
pub mod round;
