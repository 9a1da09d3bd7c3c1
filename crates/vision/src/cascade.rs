//! Haar 级联分类器
//!
//! 读取 OpenCV `traincascade` 格式的 XML（`stageType` 为 BOOST，
//! `featureType` 为 HAAR）。旧版 `<trees>` 格式与倾斜特征不支持。

use crate::error::{Result, VisionError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;
use std::str::FromStr;

/// OpenCV 读入阶段阈值时减去的容差
const THRESHOLD_EPS: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct HaarCascade {
    pub window_width: u32,
    pub window_height: u32,
    pub stages: Vec<Stage>,
    pub features: Vec<HaarFeature>,
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub threshold: f32,
    pub classifiers: Vec<WeakClassifier>,
}

/// 弱分类器：一棵小决策树（最常见的是单节点 stump）
#[derive(Debug, Clone)]
pub struct WeakClassifier {
    pub nodes: Vec<TreeNode>,
    pub leaves: Vec<f32>,
}

/// `left` / `right` 大于 0 指向下一个节点，否则 `-value` 为叶子下标
#[derive(Debug, Clone, Copy)]
pub struct TreeNode {
    pub left: i32,
    pub right: i32,
    pub feature: usize,
    pub threshold: f32,
}

#[derive(Debug, Clone)]
pub struct HaarFeature {
    pub rects: Vec<WeightedRect>,
}

#[derive(Debug, Clone, Copy)]
pub struct WeightedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub weight: f32,
}

impl HaarCascade {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VisionError::Cascade(format!(
                "文件不存在: {}",
                path.display()
            )));
        }
        let xml = std::fs::read_to_string(path)?;
        let cascade = Self::from_xml(&xml)?;
        log::info!(
            "[Face] 已加载级联 {}：{} 级，{} 个特征，窗口 {}x{}",
            path.display(),
            cascade.stages.len(),
            cascade.features.len(),
            cascade.window_width,
            cascade.window_height
        );
        Ok(cascade)
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = parse_tree(xml)?;
        let cascade = root
            .child("opencv_storage")
            .and_then(|s| s.child("cascade"))
            .ok_or_else(|| invalid("缺少 opencv_storage/cascade（旧版格式不受支持）"))?;

        let stage_type = cascade.text_of("stageType").unwrap_or_default();
        if stage_type != "BOOST" {
            return Err(invalid(format!("stageType 必须为 BOOST，实际为 {}", stage_type)));
        }
        let feature_type = cascade.text_of("featureType").unwrap_or_default();
        if feature_type != "HAAR" {
            return Err(invalid(format!(
                "featureType 必须为 HAAR，实际为 {}",
                feature_type
            )));
        }

        let window_width: u32 = parse_one(cascade, "width")?;
        let window_height: u32 = parse_one(cascade, "height")?;
        if window_width < 3 || window_height < 3 {
            return Err(invalid("检测窗口过小"));
        }

        let features = cascade
            .child("features")
            .ok_or_else(|| invalid("缺少 features"))?
            .items()
            .map(|f| parse_feature(f, window_width, window_height))
            .collect::<Result<Vec<_>>>()?;

        let stages = cascade
            .child("stages")
            .ok_or_else(|| invalid("缺少 stages"))?
            .items()
            .map(|s| parse_stage(s, features.len()))
            .collect::<Result<Vec<_>>>()?;

        if stages.is_empty() {
            return Err(invalid("stages 为空"));
        }

        Ok(Self {
            window_width,
            window_height,
            stages,
            features,
        })
    }
}

fn invalid(msg: impl Into<String>) -> VisionError {
    VisionError::Cascade(msg.into())
}

fn parse_stage(node: &XmlNode, feature_count: usize) -> Result<Stage> {
    let threshold: f32 = parse_one(node, "stageThreshold")?;
    let classifiers = node
        .child("weakClassifiers")
        .ok_or_else(|| invalid("stage 缺少 weakClassifiers"))?
        .items()
        .map(|w| parse_weak(w, feature_count))
        .collect::<Result<Vec<_>>>()?;

    Ok(Stage {
        threshold: threshold - THRESHOLD_EPS,
        classifiers,
    })
}

fn parse_weak(node: &XmlNode, feature_count: usize) -> Result<WeakClassifier> {
    let raw: Vec<f64> = parse_list(node, "internalNodes")?;
    let leaves: Vec<f32> = parse_list(node, "leafValues")?;

    if raw.is_empty() || raw.len() % 4 != 0 {
        return Err(invalid("internalNodes 长度必须是 4 的倍数"));
    }

    let in_range = |v: f64| v.is_finite() && v > i32::MIN as f64 && v <= i32::MAX as f64;
    if raw
        .chunks(4)
        .any(|c| !c[..3].iter().all(|&v| in_range(v)) || c[2] < 0.0)
    {
        return Err(invalid("internalNodes 数值越界"));
    }

    let nodes: Vec<TreeNode> = raw
        .chunks(4)
        .map(|c| TreeNode {
            left: c[0] as i32,
            right: c[1] as i32,
            feature: c[2] as usize,
            threshold: c[3] as f32,
        })
        .collect();

    // 内部节点只能指向后面的节点，保证遍历必然结束
    for (index, n) in nodes.iter().enumerate() {
        if n.feature >= feature_count {
            return Err(invalid(format!("特征下标越界: {}", n.feature)));
        }
        for child in [n.left, n.right] {
            let ok = if child > 0 {
                let child = child as usize;
                child > index && child < nodes.len()
            } else {
                child
                    .checked_neg()
                    .map_or(false, |leaf| (leaf as usize) < leaves.len())
            };
            if !ok {
                return Err(invalid(format!("树节点引用越界: {}", child)));
            }
        }
    }

    Ok(WeakClassifier { nodes, leaves })
}

fn parse_feature(node: &XmlNode, window_width: u32, window_height: u32) -> Result<HaarFeature> {
    if node.text_of("tilted").map_or(false, |t| t != "0") {
        return Err(invalid("不支持倾斜 Haar 特征"));
    }

    let rects = node
        .child("rects")
        .ok_or_else(|| invalid("feature 缺少 rects"))?
        .items()
        .map(|r| {
            let v: Vec<f32> = numbers(&r.text)?;
            if v.len() != 5 {
                return Err(invalid("rect 需要 5 个数值"));
            }
            if v[..4].iter().any(|&n| n < 0.0) {
                return Err(invalid("rect 坐标不能为负"));
            }
            let rect = WeightedRect {
                x: v[0] as u32,
                y: v[1] as u32,
                width: v[2] as u32,
                height: v[3] as u32,
                weight: v[4],
            };
            if rect.x + rect.width > window_width || rect.y + rect.height > window_height {
                return Err(invalid("rect 超出检测窗口"));
            }
            Ok(rect)
        })
        .collect::<Result<Vec<_>>>()?;

    if rects.is_empty() {
        return Err(invalid("feature 没有 rect"));
    }

    Ok(HaarFeature { rects })
}

fn parse_one<T: FromStr>(node: &XmlNode, name: &str) -> Result<T> {
    let text = node
        .text_of(name)
        .ok_or_else(|| invalid(format!("缺少 {}", name)))?;
    text.parse()
        .map_err(|_| invalid(format!("{} 不是有效数值: {}", name, text)))
}

fn parse_list<T: FromStr>(node: &XmlNode, name: &str) -> Result<Vec<T>> {
    let text = node
        .text_of(name)
        .ok_or_else(|| invalid(format!("缺少 {}", name)))?;
    numbers(text)
}

fn numbers<T: FromStr>(text: &str) -> Result<Vec<T>> {
    text.split_whitespace()
        .map(|t| t.parse().map_err(|_| invalid(format!("无效数值: {}", t))))
        .collect()
}

/// 极简 DOM：只保留元素名、文本和子元素
#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// OpenCV 以 `<_>` 表示序列元素
    fn items(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter(|c| c.name == "_")
    }
}

fn parse_tree(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    let mut stack = vec![XmlNode::default()];

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(XmlNode::named(e.local_name().as_ref())),
            Event::Empty(e) => {
                let node = XmlNode::named(e.local_name().as_ref());
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| invalid("XML 结构错误"))?;
                stack
                    .last_mut()
                    .ok_or_else(|| invalid("XML 结构错误"))?
                    .children
                    .push(node);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(invalid("XML 元素未闭合"));
    }
    stack.pop().ok_or_else(|| invalid("XML 为空"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 24x24 窗口，单级单 stump：中心 12x12 比整个窗口更亮时通过
    pub(crate) const CENTER_BRIGHT_XML: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<cascade type_id="opencv-cascade-classifier"><stageType>BOOST</stageType>
  <featureType>HAAR</featureType>
  <height>24</height>
  <width>24</width>
  <stageParams>
    <maxWeakCount>1</maxWeakCount></stageParams>
  <featureParams>
    <maxCatCount>0</maxCatCount></featureParams>
  <stageNum>1</stageNum>
  <stages>
    <_>
      <maxWeakCount>1</maxWeakCount>
      <stageThreshold>0.</stageThreshold>
      <weakClassifiers>
        <_>
          <internalNodes>
            0 -1 0 1.0000000149011612e-01</internalNodes>
          <leafValues>
            -1. 1.</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>
          0 0 24 24 -1.</_>
        <_>
          6 6 12 12 4.</_></rects></_></features></cascade>
</opencv_storage>
"#;

    #[test]
    fn test_parse_cascade() {
        let cascade = HaarCascade::from_xml(CENTER_BRIGHT_XML).unwrap();
        assert_eq!(cascade.window_width, 24);
        assert_eq!(cascade.window_height, 24);
        assert_eq!(cascade.stages.len(), 1);
        assert_eq!(cascade.features.len(), 1);

        let weak = &cascade.stages[0].classifiers[0];
        assert_eq!(weak.nodes.len(), 1);
        assert_eq!(weak.nodes[0].left, 0);
        assert_eq!(weak.nodes[0].right, -1);
        assert_eq!(weak.leaves, vec![-1.0, 1.0]);
        assert!((weak.nodes[0].threshold - 0.1).abs() < 1e-6);

        let rects = &cascade.features[0].rects;
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[1].x, 6);
        assert_eq!(rects[1].width, 12);
        assert_eq!(rects[1].weight, 4.0);
    }

    #[test]
    fn test_reject_tilted() {
        let xml = CENTER_BRIGHT_XML.replace("</rects></_></features>", "</rects>\n<tilted>1</tilted></_></features>");
        assert!(matches!(
            HaarCascade::from_xml(&xml),
            Err(VisionError::Cascade(_))
        ));
    }

    #[test]
    fn test_reject_lbp() {
        let xml = CENTER_BRIGHT_XML.replace(">HAAR<", ">LBP<");
        assert!(HaarCascade::from_xml(&xml).is_err());
    }

    #[test]
    fn test_reject_out_of_window_rect() {
        let xml = CENTER_BRIGHT_XML.replace("6 6 12 12 4.", "20 6 12 12 4.");
        assert!(HaarCascade::from_xml(&xml).is_err());
    }

    #[test]
    fn test_reject_bad_feature_index() {
        let xml = CENTER_BRIGHT_XML.replace("0 -1 0 1.0000000149011612e-01", "0 -1 3 0.1");
        assert!(HaarCascade::from_xml(&xml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cascade.xml");
        std::fs::write(&path, CENTER_BRIGHT_XML).unwrap();
        let cascade = HaarCascade::load(&path).unwrap();
        assert_eq!(cascade.stages.len(), 1);
    }

    #[test]
    fn test_reject_out_of_range_node_value() {
        let xml = CENTER_BRIGHT_XML.replace("0 -1 0 1.0000000149011612e-01", "-3e10 -1 0 0.1");
        assert!(matches!(
            HaarCascade::from_xml(&xml),
            Err(VisionError::Cascade(_))
        ));
    }

    #[test]
    fn test_reject_cyclic_tree() {
        let self_loop = CENTER_BRIGHT_XML.replace(
            "0 -1 0 1.0000000149011612e-01",
            "1 -1 0 0.1 1 -1 0 0.1",
        );
        assert!(HaarCascade::from_xml(&self_loop).is_err());

        let back_edge = CENTER_BRIGHT_XML.replace(
            "0 -1 0 1.0000000149011612e-01",
            "1 -1 0 0.1 0 -1 0 0.1",
        );
        assert!(HaarCascade::from_xml(&back_edge).is_err());
    }

    #[test]
    fn test_accept_two_node_tree() {
        let xml = CENTER_BRIGHT_XML.replace(
            "0 -1 0 1.0000000149011612e-01",
            "1 -1 0 0.1 0 -1 0 0.2",
        );
        let cascade = HaarCascade::from_xml(&xml).unwrap();
        assert_eq!(cascade.stages[0].classifiers[0].nodes.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        assert!(HaarCascade::load(Path::new("/nonexistent/cascade.xml")).is_err());
    }
}
