/// Template name; the `.html` suffix turns on Tera's auto-escaping.
pub const CV_TEMPLATE_NAME: &str = "cv.html";
pub const CV_HTML: &str = include_str!("../templates/cv.html");
