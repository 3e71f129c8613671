use std::env;

use praxis_codegen::Codegen;

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let codegen = Codegen::new("server/actions");
    codegen.emit_rerun_directives();
    if let Err(err) = codegen.write_to(out_dir) {
        panic!("action codegen failed: {err}");
    }
}
