use std::process::Command;

/// Short revision for `/health`; `BUILD_REVISION` wins when set (container builds
/// usually have no `.git`).
fn revision() -> String {
    if let Ok(rev) = std::env::var("BUILD_REVISION") {
        if !rev.trim().is_empty() {
            return rev.trim().to_string();
        }
    }

    let git = |args: &[&str]| Command::new("git").args(args).output().ok();

    match git(&["rev-parse", "--short", "HEAD"]) {
        Some(out) if out.status.success() => {
            let hash = String::from_utf8_lossy(&out.stdout).trim().to_string();
            let dirty = git(&["diff", "--quiet"]).is_some_and(|o| !o.status.success());
            if dirty { format!("{hash}-dirty") } else { hash }
        }
        _ => "unknown".to_string(),
    }
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", revision());
    println!("cargo:rerun-if-env-changed=BUILD_REVISION");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
