//! Web Speech API handles, reached through reflection so a browser without
//! them simply yields `None`.

use console_core::voice::{
    RecognitionOptions, SpeechPlatform, SpeechRecognizer, SpeechSynthesizer, VoiceEvent,
};
use js_sys::{Array, Function, Reflect};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

pub type EventSink = Rc<dyn Fn(VoiceEvent)>;

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn call_method(target: &JsValue, name: &str, args: &[&JsValue]) -> Result<(), String> {
    let method = get(target, name)
        .filter(JsValue::is_function)
        .ok_or_else(|| format!("{name} is not available"))?
        .unchecked_into::<Function>();
    let result = match args {
        [] => method.call0(target),
        [a] => method.call1(target, a),
        _ => return Err(format!("{name}: unsupported arity")),
    };
    result.map(|_| ()).map_err(|e| {
        e.as_string()
            .or_else(|| get(&e, "message").and_then(|m| m.as_string()))
            .unwrap_or_else(|| format!("{name} failed"))
    })
}

fn constructor(names: &[&str]) -> Option<Function> {
    let window: JsValue = web_sys::window()?.into();
    names
        .iter()
        .find_map(|n| get(&window, n))
        .filter(JsValue::is_function)
        .map(|f| f.unchecked_into::<Function>())
}

pub struct WebSpeech {
    sink: EventSink,
}

impl WebSpeech {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }
}

impl SpeechPlatform for WebSpeech {
    type Recognizer = WebRecognizer;
    type Synthesizer = WebSynthesizer;

    fn recognizer(&self, options: &RecognitionOptions) -> Option<WebRecognizer> {
        let ctor = constructor(&["SpeechRecognition", "webkitSpeechRecognition"])?;
        let inner = Reflect::construct(&ctor, &Array::new()).ok()?;

        let set = |key: &str, value: JsValue| {
            let _ = Reflect::set(&inner, &JsValue::from_str(key), &value);
        };
        set("continuous", JsValue::from_bool(options.continuous));
        set("interimResults", JsValue::from_bool(options.interim_results));
        set("lang", JsValue::from_str(&options.lang));

        let sink = self.sink.clone();
        let on_result = Closure::<dyn FnMut(JsValue)>::new(move |ev: JsValue| {
            sink(read_result(&ev));
        });
        let sink = self.sink.clone();
        let on_end = Closure::<dyn FnMut(JsValue)>::new(move |_ev: JsValue| {
            sink(VoiceEvent::End);
        });
        let sink = self.sink.clone();
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |ev: JsValue| {
            sink(VoiceEvent::Error(get(&ev, "error").and_then(|v| v.as_string())));
        });

        set("onresult", on_result.as_ref().clone());
        set("onend", on_end.as_ref().clone());
        set("onerror", on_error.as_ref().clone());

        Some(WebRecognizer {
            inner,
            _handlers: [on_result, on_end, on_error],
        })
    }

    fn synthesizer(&self) -> Option<WebSynthesizer> {
        let window: JsValue = web_sys::window()?.into();
        let synthesis = get(&window, "speechSynthesis")?;
        let utterance = constructor(&["SpeechSynthesisUtterance"])?;
        Some(WebSynthesizer {
            synthesis,
            utterance,
        })
    }
}

fn read_result(ev: &JsValue) -> VoiceEvent {
    let result_index = get(ev, "resultIndex")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as usize;
    let mut transcripts = Vec::new();
    if let Some(results) = get(ev, "results") {
        let len = get(&results, "length")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as u32;
        for i in 0..len {
            let text = Reflect::get_u32(&results, i)
                .ok()
                .and_then(|r| Reflect::get_u32(&r, 0).ok())
                .and_then(|alt| get(&alt, "transcript"))
                .and_then(|t| t.as_string())
                .unwrap_or_default();
            transcripts.push(text);
        }
    }
    VoiceEvent::Result {
        result_index,
        transcripts,
    }
}

pub struct WebRecognizer {
    inner: JsValue,
    _handlers: [Closure<dyn FnMut(JsValue)>; 3],
}

impl SpeechRecognizer for WebRecognizer {
    fn start(&mut self) -> Result<(), String> {
        call_method(&self.inner, "start", &[])
    }

    fn stop(&mut self) {
        let _ = call_method(&self.inner, "stop", &[]);
    }

    fn abort(&mut self) {
        let _ = call_method(&self.inner, "abort", &[]);
    }
}

impl Drop for WebRecognizer {
    fn drop(&mut self) {
        // handlers are freed with us; the browser must not call into them afterwards
        for key in ["onresult", "onend", "onerror"] {
            let _ = Reflect::set(&self.inner, &JsValue::from_str(key), &JsValue::NULL);
        }
    }
}

pub struct WebSynthesizer {
    synthesis: JsValue,
    utterance: Function,
}

impl SpeechSynthesizer for WebSynthesizer {
    fn cancel(&mut self) {
        let _ = call_method(&self.synthesis, "cancel", &[]);
    }

    fn speak(&mut self, text: &str, rate: f32) -> Result<(), String> {
        let args = Array::of1(&JsValue::from_str(text));
        let utterance = Reflect::construct(&self.utterance, &args)
            .map_err(|_| "failed to create utterance".to_string())?;
        let _ = Reflect::set(
            &utterance,
            &JsValue::from_str("rate"),
            &JsValue::from_f64(f64::from(rate)),
        );
        call_method(&self.synthesis, "speak", &[&utterance])
    }
}
