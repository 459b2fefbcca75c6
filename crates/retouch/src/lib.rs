#![doc = include_str!("../README.md")]

#[doc(inline)]
pub use retouch_image as image;

#[doc(inline)]
pub use retouch_imgproc as imgproc;
