pub mod phantom;

pub use phantom::{
    build_phantom, build_scan, shepp_logan, GeneratedScan, GeneratorConfig, PhantomKind,
};
