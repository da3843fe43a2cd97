use std::collections::HashMap;

use artisanhub::constant::{
    ENV_VAR_CONFIG_FILE_PATH, ENV_VAR_SERVICE_BASE_PATH, ENV_VAR_SYS_BASE_PATH,
};
use artisanhub::error::{AppError, AppErrorCode};
use artisanhub::AppConfig;

use crate::EXAMPLE_REL_PATH;

#[test]
fn cfg_extract_arg_ok() {
    let args = [
        (
            ENV_VAR_CONFIG_FILE_PATH.to_string(),
            "relative/to/mycfg.json".to_string(),
        ),
        (ENV_VAR_SYS_BASE_PATH.to_string(), "/path/sys".to_string()),
        (
            ENV_VAR_SERVICE_BASE_PATH.to_string(),
            "/path/service".to_string(),
        ),
    ];
    let result = AppConfig::new(HashMap::from(args));
    // the paths above do not exist, reaching the file-open stage means
    // all the environment arguments were accepted
    let err = result.err().unwrap();
    assert_eq!(
        err.code,
        AppErrorCode::IOerror(std::io::ErrorKind::NotFound)
    );
}

#[test]
fn cfg_extract_arg_missing_sys_path() {
    let result = AppConfig::new(HashMap::new());
    let err = result.err().unwrap();
    assert_eq!(err.code, AppErrorCode::MissingSysBasePath);
}

#[test]
fn cfg_extract_arg_missing_service_path() {
    let args = [(ENV_VAR_SYS_BASE_PATH.to_string(), "/path/sys".to_string())];
    let result = AppConfig::new(HashMap::from(args));
    let err = result.err().unwrap();
    assert_eq!(err.code, AppErrorCode::MissingAppBasePath);
}

#[test]
fn parse_ext_cfg_file_ok() {
    let service_basepath = env!("CARGO_MANIFEST_DIR").to_string();
    let fullpath = service_basepath + EXAMPLE_REL_PATH + "config_ok.json";
    let result = AppConfig::parse_from_file(fullpath);
    assert!(result.is_ok());
    let actual = result.unwrap();
    assert_eq!(actual.listen.api_version.as_str(), "1.0.33");
    assert!(!actual.listen.host.is_empty());
    assert!(actual.listen.port > 0);
    assert!(!actual.listen.routes.is_empty());
    assert!(!actual.logging.handlers.is_empty());
    assert!(!actual.logging.loggers.is_empty());
    assert!(actual.stack_sz_kb > 0);
    for route in actual.listen.routes.iter() {
        assert!(!route.path.is_empty());
        assert!(!route.handler.is_empty());
    }
    for loghdlr in actual.logging.handlers.iter() {
        assert!(!loghdlr.alias.is_empty());
    }
    for logger in actual.logging.loggers.iter() {
        assert!(!logger.alias.is_empty());
        assert!(!logger.handlers.is_empty());
    }
}

fn _parse_ext_cfg_file_error_common(cfg_filepath: &str, expect_err: AppErrorCode) -> AppError {
    let service_basepath = env!("CARGO_MANIFEST_DIR").to_string();
    let fullpath = service_basepath + EXAMPLE_REL_PATH + cfg_filepath;
    let result = AppConfig::parse_from_file(fullpath);
    let err = result.err().unwrap();
    assert_eq!(err.code, expect_err);
    err
}

#[test]
fn parse_ext_cfg_file_missing_fields() {
    _parse_ext_cfg_file_error_common(
        "config_missing_logging.json",
        AppErrorCode::InvalidJsonFormat,
    );
    _parse_ext_cfg_file_error_common("config_web_empty_host.json", AppErrorCode::InvalidJsonFormat);
}

#[test]
fn parse_ext_cfg_file_invalid_api_version() {
    _parse_ext_cfg_file_error_common(
        "config_invalid_api_version.json",
        AppErrorCode::InvalidVersion,
    );
}

#[test]
fn parse_ext_cfg_file_listener_invalid_fields() {
    _parse_ext_cfg_file_error_common(
        "config_web_empty_routes.json",
        AppErrorCode::NoRouteApiServerCfg,
    );
    _parse_ext_cfg_file_error_common("config_invalid_route.json", AppErrorCode::InvalidRouteConfig);
}

#[test]
fn parse_ext_cfg_file_log_invalid_fields() {
    _parse_ext_cfg_file_error_common("config_log_no_handler.json", AppErrorCode::NoLogHandlerCfg);
    _parse_ext_cfg_file_error_common("config_log_no_logger.json", AppErrorCode::NoLoggerCfg);
    _parse_ext_cfg_file_error_common(
        "config_logger_without_handler.json",
        AppErrorCode::NoHandlerInLoggerCfg,
    );
    _parse_ext_cfg_file_error_common(
        "config_logger_with_nonexist_handler.json",
        AppErrorCode::InvalidHandlerLoggerCfg,
    );
}

#[test]
fn parse_ext_cfg_file_dstore_exceed_limit() {
    _parse_ext_cfg_file_error_common(
        "config_dstore_inmem_exceed_max_items.json",
        AppErrorCode::ExceedingMaxLimit,
    );
}
