pub mod show_image;
