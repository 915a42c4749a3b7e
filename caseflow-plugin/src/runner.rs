//! 客户端触发分发：按事件匹配插件并做尾沿防抖
//!
//! 用户侧触发（输入、失焦）远比底层集成该被调用的频率高；
//! 防抖把窗口内的连续触发折叠成一次调用，且永远用最新的 context。

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use caseflow_dto::ActionResult;

use crate::plugin::Plugin;
use crate::registry::PluginRegistry;

/// 调用结论的投递回调（编排层在这里把成功动作折叠回 context）
pub type BoxedResultFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
pub type ResultSink = Arc<dyn Fn(Arc<dyn Plugin>, ActionResult) -> BoxedResultFuture + Send + Sync>;

/// 可取消的定时任务句柄
pub struct TimerHandle {
    inner: tokio::task::JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.inner.abort();
    }
}

/// 尾沿防抖器：新调度先取消上一个尚未触发的句柄
#[derive(Default)]
pub struct Debouncer {
    current: Mutex<Option<TimerHandle>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut current = self.current.lock().expect("debouncer lock poisoned");
        if let Some(previous) = current.take() {
            previous.cancel();
        }
        *current = Some(TimerHandle {
            inner: tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                task.await;
            }),
        });
    }
}

/// 单个插件的触发入口
pub struct PluginRunner {
    plugin: Arc<dyn Plugin>,
    debouncer: Debouncer,
    sink: ResultSink,
}

impl PluginRunner {
    pub fn new(plugin: Arc<dyn Plugin>, sink: ResultSink) -> Self {
        Self {
            plugin,
            debouncer: Debouncer::new(),
            sink,
        }
    }

    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    /// 任一 runOn 绑定命中即匹配
    pub fn matches(&self, event_type: &str, element_id: Option<&str>) -> bool {
        self.plugin
            .run_on()
            .iter()
            .any(|binding| binding.matches(event_type, element_id))
    }

    /// 触发一次
    ///
    /// * 未设或 0 防抖：立即调用并返回结论，一次触发一次调用，不合并
    /// * 防抖 > 0：窗口内的触发互相顶替，窗口安静后以最后一次的
    ///   context 调用一次；结论只经 sink 投递，返回 `None`
    pub async fn run(&self, context: Value) -> Option<ActionResult> {
        let debounce_ms = self.plugin.common_params().debounce_time;

        if debounce_ms == 0 {
            let result = self.plugin.invoke(&context).await;
            (self.sink)(self.plugin.clone(), result.clone()).await;
            return Some(result);
        }

        let plugin = self.plugin.clone();
        let sink = self.sink.clone();
        self.debouncer
            .schedule(Duration::from_millis(debounce_ms), async move {
                let result = plugin.invoke(&context).await;
                sink(plugin, result).await;
            });
        None
    }
}

/// 已注册插件的 runner 集合
pub struct PluginRunnerSet {
    runners: Vec<Arc<PluginRunner>>,
}

impl PluginRunnerSet {
    pub fn from_registry(registry: &PluginRegistry, sink: ResultSink) -> Self {
        let runners = registry
            .plugins()
            .map(|plugin| Arc::new(PluginRunner::new(plugin.clone(), sink.clone())))
            .collect();
        Self { runners }
    }

    pub fn runners(&self) -> &[Arc<PluginRunner>] {
        &self.runners
    }

    /// 返回所有匹配触发事件（以及可选元素 id）的 runner
    pub fn matching(&self, event_type: &str, element_id: Option<&str>) -> Vec<Arc<PluginRunner>> {
        self.runners
            .iter()
            .filter(|runner| runner.matches(event_type, element_id))
            .cloned()
            .collect()
    }
}
