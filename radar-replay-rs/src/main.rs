fn main() {
    radar_replay::cli::run();
}
