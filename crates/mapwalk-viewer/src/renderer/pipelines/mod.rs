pub mod path_line;
pub mod phong;
