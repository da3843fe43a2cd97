use std::fs::{remove_file, File};

use serde_json::{from_value as json_from_value, json};

use artisanhub::logging::{AppLogContext, AppLogLevel};
use artisanhub::{to_3rdparty_level, AppBasepathCfg, AppLoggingCfg};

#[test]
fn init_log_context_ok() {
    let base = env!("CARGO_MANIFEST_DIR").to_string();
    // ---- setup
    let basepath = AppBasepathCfg {
        system: base.clone(),
        service: base.clone(),
    };
    let log_file_path = "tmp/log/test/artisanhub_unit_test.log";
    let logger_keys = ["should-be-module-path", "another-module-hier"];
    let cfg = {
        let val = json!({
            "handlers" : [
                {"alias": "errlog-file-789", "min_level": "WARNING",
                 "path": log_file_path,  "destination": "localfs"},
                {"alias": "std-output-321",  "min_level": "ERROR",
                 "destination": "console"}
            ],
            "loggers" : [
                {"alias": logger_keys[0],
                 "handlers": ["errlog-file-789", "std-output-321"],
                 "level": "INFO"},
                {"alias": logger_keys[1],
                 "handlers": ["errlog-file-789"] }
            ]
        });
        json_from_value::<AppLoggingCfg>(val).unwrap()
    };
    let actual = AppLogContext::new(&basepath, &cfg);
    for key in logger_keys {
        let result = actual.get_assigner(key);
        assert!(result.is_some());
        let logger = result.unwrap();
        tracing::dispatcher::with_default(logger, || {
            const LVL: tracing::Level = to_3rdparty_level!(AppLogLevel::ERROR);
            tracing::event!(LVL, "invoked by unit test");
        });
    }
    {
        let fullpath = base + "/" + log_file_path;
        let result = File::open(fullpath.clone());
        assert!(result.is_ok());
        let f = result.unwrap();
        drop(f);
        let result = remove_file(fullpath);
        assert!(result.is_ok());
    }
} // end of init_log_context_ok
