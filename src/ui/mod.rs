pub mod status_bar;
pub mod theme;
pub mod typing_area;
