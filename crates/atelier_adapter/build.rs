fn main() {
    let proto_file = "proto/studio_adapter.proto";
    println!("cargo:rerun-if-changed={proto_file}");
    tonic_build::configure()
        .build_server(true)
        .compile_protos(&[proto_file], &["proto"])
        .expect("studio adapter proto compilation must succeed");
}
