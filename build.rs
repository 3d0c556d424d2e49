use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=PADDLE_INFERENCE_DIR");
    if env::var_os("CARGO_FEATURE_PADDLE").is_none() {
        return;
    }

    // Layout of the prebuilt Paddle Inference C package:
    // <dir>/paddle/lib/libpaddle_inference_c.so plus third_party libs.
    match env::var("PADDLE_INFERENCE_DIR") {
        Ok(dir) => {
            let root = PathBuf::from(dir);
            let lib_dir = root.join("paddle").join("lib");
            println!("cargo:rustc-link-search=native={}", lib_dir.display());
            println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());
        }
        Err(_) => {
            println!(
                "cargo:warning=PADDLE_INFERENCE_DIR is not set, relying on the system linker path"
            );
        }
    }
    println!("cargo:rustc-link-lib=dylib=paddle_inference_c");
}
