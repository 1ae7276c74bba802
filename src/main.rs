fn main() {
    studyplan::run();
}
