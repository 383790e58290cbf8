//! Module Loader - 이름으로 모듈 인스턴스를 만드는 팩토리
//!
//! 코드를 실제로 적재하는 방식은 로더 구현체의 몫이며 오케스트레이터는
//! `Arc<dyn Module>`만 받습니다.

use super::traits::Module;
use crate::builtin::{FilterModule, ImportModule};
use luxoria_foundation::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 모듈 로더
pub trait ModuleLoader: Send + Sync {
    /// 이름으로 모듈 생성
    fn load(&self, name: &str) -> Result<Arc<dyn Module>>;

    /// 로드 가능한 모듈 이름 목록
    fn available(&self) -> Vec<String>;
}

type ModuleFactory = Box<dyn Fn() -> Arc<dyn Module> + Send + Sync>;

/// 프로세스에 포함된 모듈을 생성하는 로더
#[derive(Default)]
pub struct BuiltinModuleLoader {
    factories: BTreeMap<String, ModuleFactory>,
}

impl BuiltinModuleLoader {
    /// 빈 로더
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 모듈(LuxImport, LuxFilter) 포함
    pub fn with_builtins() -> Self {
        let mut loader = Self::new();
        loader.register(ImportModule::NAME, || Arc::new(ImportModule::new()) as Arc<dyn Module>);
        loader.register(FilterModule::NAME, || Arc::new(FilterModule::new()) as Arc<dyn Module>);
        loader
    }

    /// 팩토리 등록 (같은 이름이면 교체)
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Module> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }
}

impl ModuleLoader for BuiltinModuleLoader {
    fn load(&self, name: &str) -> Result<Arc<dyn Module>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::ModuleLoad(format!("unknown module: {}", name)))?;
        Ok(factory())
    }

    fn available(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loader() {
        let loader = BuiltinModuleLoader::with_builtins();

        assert_eq!(loader.available(), vec!["LuxFilter".to_string(), "LuxImport".to_string()]);

        let module = loader.load("LuxImport").unwrap();
        assert_eq!(module.descriptor().name, "LuxImport");
    }

    #[test]
    fn test_unknown_module() {
        let loader = BuiltinModuleLoader::new();
        let err = loader.load("LuxStudio").err().unwrap();
        assert!(matches!(err, Error::ModuleLoad(_)));
    }
}
