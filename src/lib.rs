// Базовые модули
pub mod consts;
pub mod error;
pub mod config;

// Декодеры раскладки и доступ к образу
pub mod layout;   // src/layout/{mod,common,blockref,ident,urlader,anchor,table,drinfo,pcb}.rs
pub mod image;

// Копирование страниц/таблиц и обход дерева
pub mod copy;
pub mod extract;  // src/extract/{mod,engine,sink,report}.rs

// Перестановка блоков архивных образов
pub mod linearize;

pub mod cli;

// Удобные реэкспорты
pub use config::ExtractConfig;
pub use error::{HgError, HgResult};
pub use extract::{extract_all, extract_image, read_headers, ExtractReport, ImageReport};
pub use image::HgImage;
pub use layout::{BlockRef, Resolved};
