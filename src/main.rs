mod entry;
mod logger;

use moya::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
