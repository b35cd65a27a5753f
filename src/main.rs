fn main() {
    gbm_tracker_lib::run();
}
