mod album_form;
mod albums;
mod gallery;
mod navigation;
mod photo_upload;

pub use album_form::AlbumFormModal;
pub use albums::AlbumsScreen;
pub use gallery::GalleryScreen;
pub use navigation::NavigationBar;
pub use photo_upload::PhotoUploadModal;
