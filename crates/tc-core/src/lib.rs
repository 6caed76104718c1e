pub mod bushu;
pub mod dict;
pub mod keymap;
pub mod mazegaki;
pub mod settings;
pub mod unicode;
