fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the bundled protoc so builds do not depend on a system install.
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    println!("cargo:rerun-if-changed=proto/inference.proto");
    tonic_build::configure().compile(&["proto/inference.proto"], &["proto"])?;
    Ok(())
}
