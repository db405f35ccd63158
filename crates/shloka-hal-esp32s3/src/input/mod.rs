pub mod wake_button;
