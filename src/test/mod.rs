mod directory;

use ctor::ctor;

#[ctor]
fn logs() {
    env_logger::init();
}
