//! Terminal output shared by the bootstrap and the plugins

use console::style;

/// Prints a success message
pub fn success(message: &str) {
    println!("{}", message);
}

/// Prints a highlighted notice followed by a blank line
pub fn notice(message: &str) {
    println!("{}\n", style(message).cyan().bold());
}

/// Prints one notice per deprecated plugin
pub fn deprecation_notices(warnings: &[String]) {
    for warning in warnings {
        notice(&deprecation_line(warning));
    }
}

fn deprecation_line(warning: &str) -> String {
    format!("[Deprecation Notice] {}", warning)
}
