fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-env-changed=TRAILHEAD_SUPABASE_URL");
    println!("cargo:rerun-if-env-changed=TRAILHEAD_SUPABASE_ANON_KEY");
    println!("cargo:rerun-if-env-changed=TRAILHEAD_SITE_URL");
    println!("cargo:rerun-if-env-changed=TRAILHEAD_LOG_LEVEL");

    built::write_built_file()
}
