//! Filename-extension to content-type lookup for the static file handler.

use std::{ffi::OsStr, path::Path};

/// Returned when no extension matches.
pub const DEFAULT: &str = "application/octet-stream";

const TABLE: &[(&str, &str)] = &[
	("bmp", "image/bmp"),
	("css", "text/css"),
	("flv", "video/x-flv"),
	("gif", "image/gif"),
	("htm", "text/html"),
	("html", "text/html"),
	("ico", "image/vnd.microsoft.icon"),
	("jpe", "image/jpeg"),
	("jpeg", "image/jpeg"),
	("jpg", "image/jpeg"),
	("js", "application/javascript"),
	("json", "application/json"),
	("php", "text/html"),
	("png", "image/png"),
	("svg", "image/svg+xml"),
	("svgz", "image/svg+xml"),
	("swf", "application/x-shockwave-flash"),
	("tif", "image/tiff"),
	("tiff", "image/tiff"),
	("txt", "text/plain"),
	("xml", "application/xml"),
];

/// A reasonable content type based on a filename extension.
pub fn lookup(extension: &str) -> &'static str {
	TABLE
		.iter()
		.find(|(ext, _)| *ext == extension)
		.map(|(_, content_type)| *content_type)
		.unwrap_or(DEFAULT)
}

/// A reasonable content type based on the extension of a file path.
pub fn resolve(path: &Path) -> &'static str {
	lookup(path.extension().and_then(OsStr::to_str).unwrap_or_default())
}
