// 분석 모듈
// 크로스오버 탐지, 분류, 심볼 배치 오케스트레이션을 제공합니다.

pub mod batch;
pub mod classifier;
pub mod crossover;
