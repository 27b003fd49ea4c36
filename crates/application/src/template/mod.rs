mod service;

pub use service::TemplateService;
