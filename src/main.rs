fn main() -> anyhow::Result<()> {
    origin_check_lib::run()
}
