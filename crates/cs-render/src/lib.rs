//! Affichage de camscii : slot de frame atomique, dessin ratatui,
//! sérialisation ANSI truecolor et barre d'état.
pub mod ansi;
pub mod canvas;
pub mod fps;
pub mod slot;
pub mod ui;

pub use slot::DisplaySlot;
