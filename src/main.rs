fn main() {
    beamlance::game::run();
}
