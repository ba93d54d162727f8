use wesl::{CompileOptions, Wesl};

fn main() {
    let mut wesl = Wesl::new("assets/shaders");

    wesl.set_options(CompileOptions {
        lazy: false,
        ..Default::default()
    });

    wesl.build_artifact(&"package::sprite".parse().unwrap(), "sprite");
}
