use colored::Colorize;
use once_cell::sync::Lazy;
use std::env;

/// Honors `NO_COLOR`/`SUBTRACK_PLAIN` so scripted runs and tests see stable
/// uncolored output.
static PLAIN_OUTPUT: Lazy<bool> =
    Lazy::new(|| env::var_os("NO_COLOR").is_some() || env::var_os("SUBTRACK_PLAIN").is_some());

pub fn plain(message: impl AsRef<str>) {
    println!("{}", message.as_ref());
}

pub fn info(message: impl AsRef<str>) {
    if *PLAIN_OUTPUT {
        println!("[i] {}", message.as_ref());
    } else {
        println!("{} {}", "[i]".cyan(), message.as_ref());
    }
}

pub fn success(message: impl AsRef<str>) {
    if *PLAIN_OUTPUT {
        println!("[ok] {}", message.as_ref());
    } else {
        println!("{} {}", "[ok]".green(), message.as_ref());
    }
}

pub fn warning(message: impl AsRef<str>) {
    if *PLAIN_OUTPUT {
        println!("[!] {}", message.as_ref());
    } else {
        println!("{} {}", "[!]".yellow(), message.as_ref());
    }
}

pub fn section(title: impl AsRef<str>) {
    if *PLAIN_OUTPUT {
        println!("== {} ==", title.as_ref());
    } else {
        println!("{}", format!("== {} ==", title.as_ref()).bold());
    }
}
